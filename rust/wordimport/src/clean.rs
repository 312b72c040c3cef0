use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

use crate::entities::replace_named_entities;
use crate::repair::repair_markup;
use crate::transform::fragment;

/// Tags kept by the fallback cleaner: character-level markup, paragraphs and tables.
const KEEP_TAGS: &[&str] = &[
    "b", "br", "em", "i", "img", "strong", "sub", "sup", "u", "table", "tbody", "td", "th",
    "thead", "tr", "p",
];

pub const PLUGINFILE: &str = "@@PLUGINFILE@@";

lazy_static! {
    static ref IMG: Regex = Regex::new(r"(?is)<img([^>]*?)/?>").unwrap();
    static ref BR: Regex = Regex::new(r"(?is)<br([^>]*?)/?>").unwrap();
    static ref NAMED_ENTITY: Regex = Regex::new(r"&[a-zA-Z]").unwrap();
    static ref IMG_COMPLETE: Regex = Regex::new(r#"(?is)<img([^>]*?)/>"#).unwrap();
    static ref PLUGINFILE_SRC: Regex =
        Regex::new(r#"<img src="@@PLUGINFILE@@/([^"]*)""#).unwrap();
}

/// Which markup repair is available to [`clean_html_text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkupRepair {
    /// Parse and re-serialise with a full HTML parser.
    Full,
    /// Fall back to tag stripping and the entity table.
    Unavailable,
}

fn find_tag_end(s: &str, lt: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = lt;
    let mut in_s = false;
    let mut in_d = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' if !in_d => in_s = !in_s,
            b'"' if !in_s => in_d = !in_d,
            b'>' if !in_s && !in_d => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn tag_name(raw: &str) -> String {
    raw.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Removes every tag not in [`KEEP_TAGS`], plus comments and processing
/// instructions. A `<` that does not start a tag is kept as text.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let Some(lt_rel) = input[i..].find('<') else {
            out.push_str(&input[i..]);
            break;
        };
        let lt = i + lt_rel;
        out.push_str(&input[i..lt]);
        i = lt;

        if input[i..].starts_with("<!--") {
            i = match input[i + 4..].find("-->") {
                Some(end) => i + 4 + end + 3,
                None => bytes.len(),
            };
            continue;
        }

        let starts_tag = matches!(
            bytes.get(i + 1),
            Some(c) if c.is_ascii_alphabetic() || matches!(c, b'/' | b'!' | b'?')
        );
        if !starts_tag {
            out.push('<');
            i += 1;
            continue;
        }

        let Some(gt) = find_tag_end(input, i) else {
            // Unterminated tag: keep the rest as text.
            out.push_str(&input[i..]);
            break;
        };
        let raw = &input[i + 1..gt];
        if KEEP_TAGS.contains(&tag_name(raw).as_str()) {
            out.push_str(&input[i..=gt]);
        }
        i = gt + 1;
    }
    out
}

/// `<br>` and `<img ...>` in explicit self-closing form.
pub fn close_void_elements(html: &str) -> String {
    let s = IMG.replace_all(html, "<img$1/>");
    BR.replace_all(&s, "<br/>").into_owned()
}

fn drop_img_complete(html: &str) -> String {
    if !html.contains("complete=\"true\"") {
        return html.to_string();
    }
    IMG_COMPLETE
        .replace_all(html, |caps: &Captures| {
            format!("<img{}/>", caps[1].replace("complete=\"true\"", ""))
        })
        .into_owned()
}

/// Decodes the file name in `<img src="@@PLUGINFILE@@/...">` so it matches the stored name.
pub fn decode_pluginfile_names(html: &str) -> String {
    if !html.contains(PLUGINFILE) {
        return html.to_string();
    }
    PLUGINFILE_SRC
        .replace_all(html, |caps: &Captures| {
            let encoded = caps[1].replace('+', " ");
            let decoded = percent_decode_str(&encoded).decode_utf8_lossy();
            format!("<img src=\"{PLUGINFILE}/{decoded}\"")
        })
        .into_owned()
}

pub fn strip_soft_hyphens(html: &str) -> String {
    html.replace('\u{AD}', "")
}

/// Tag stripping plus named-to-numeric entity rewriting, for when no full
/// markup repair is available.
pub fn fallback_clean(html: &str) -> String {
    let stripped = close_void_elements(&strip_tags(html));
    let numeric = if NAMED_ENTITY.is_match(&stripped) {
        replace_named_entities(&stripped)
    } else {
        stripped
    };
    drop_img_complete(&numeric)
}

/// Cleans an HTML fragment into well-formed XHTML suitable for the transform engine.
pub fn clean_html_text(html: &str, repair: MarkupRepair) -> String {
    let cleaned = match repair {
        MarkupRepair::Full => repair_markup(html),
        MarkupRepair::Unavailable => fallback_clean(html),
    };
    let out = strip_soft_hyphens(&decode_pluginfile_names(&cleaned));
    log::debug!("clean_html_text [{repair:?}] -> |{}|", fragment(&out, 100));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_allowed_tags() {
        let html = r#"<div class="x"><p>Hi <span>there</span> <b>bold</b></p><script>x</script><table><tr><td>1</td></tr></table></div>"#;
        assert_eq!(
            strip_tags(html),
            "<p>Hi there <b>bold</b></p>x<table><tr><td>1</td></tr></table>"
        );
    }

    #[test]
    fn comments_go_and_stray_angle_brackets_stay() {
        assert_eq!(strip_tags("a < b <!-- c --> d"), "a < b  d");
        assert_eq!(strip_tags("x <i>open"), "x <i>open");
        assert_eq!(strip_tags("x <span title=\"a>b\">y</span>"), "x y");
    }

    #[test]
    fn void_elements_become_self_closing() {
        assert_eq!(
            close_void_elements(r#"a<br>b<BR clear="all"/>c<img src="x.png">"#),
            r#"a<br/>b<br/>c<img src="x.png"/>"#
        );
        assert_eq!(close_void_elements("<img src=\"y\"/>"), "<img src=\"y\"/>");
    }

    #[test]
    fn named_entities_rewritten_markup_entities_kept() {
        assert_eq!(
            clean_html_text("&nbsp;&hellip;&amp;", MarkupRepair::Unavailable),
            "&#x00A0;&#x2026;&amp;"
        );
    }

    #[test]
    fn complete_attribute_is_removed_from_images() {
        let out = fallback_clean(r#"<p><img src="a.png" complete="true"></p>"#);
        assert_eq!(out, r#"<p><img src="a.png" /></p>"#);
    }

    #[test]
    fn pluginfile_names_are_percent_decoded() {
        let html = r#"<p><img src="@@PLUGINFILE@@/my%20pic%C3%A9.png" alt="a"/></p>"#;
        assert_eq!(
            clean_html_text(html, MarkupRepair::Unavailable),
            r#"<p><img src="@@PLUGINFILE@@/my picé.png" alt="a"/></p>"#
        );
    }

    #[test]
    fn soft_hyphens_removed_on_both_paths() {
        assert_eq!(clean_html_text("<p>co\u{AD}operate</p>", MarkupRepair::Unavailable), "<p>cooperate</p>");
        assert_eq!(clean_html_text("<p>co\u{AD}operate</p>", MarkupRepair::Full), "<p>cooperate</p>");
    }

    #[test]
    fn full_repair_path_uses_parser() {
        let out = clean_html_text("<p>a<br>b</p><div>c</div>", MarkupRepair::Full);
        assert_eq!(out, "<p>a<br/>b</p>c");
    }

    #[test]
    fn never_fails_on_garbage() {
        let out = clean_html_text("<<<&&& <p", MarkupRepair::Unavailable);
        assert_eq!(out, "<<<&&& <p");
    }
}
