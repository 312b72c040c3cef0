use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::transform::fragment;

pub const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

lazy_static! {
    static ref MML_DECLARATION: Regex = Regex::new(r#"\s+xmlns:mml="[^"]*""#).unwrap();
    static ref MATH_ROOT: Regex = Regex::new(r"<math\b([^>]*)>").unwrap();
}

/// Unprefixes MathML and declares its namespace once on each `<math>` root.
pub fn clean_math(xhtml: &str) -> String {
    if !xhtml.contains("mml:") && !xhtml.contains("<math") {
        return xhtml.to_string();
    }
    let s = xhtml
        .replace("<mml:", "<")
        .replace("</mml:", "</")
        .replace(" mathvariant=\"normal\"", "");
    let s = MML_DECLARATION.replace_all(&s, "");
    MATH_ROOT
        .replace_all(&s, |caps: &Captures| {
            let attrs = &caps[1];
            if attrs.contains("xmlns=") {
                caps[0].to_string()
            } else {
                format!("<math xmlns=\"{MATHML_NS}\"{attrs}>")
            }
        })
        .into_owned()
}

fn find_body_open(lower: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = lower[from..].find("<body") {
        let at = from + rel;
        let after = at + "<body".len();
        match lower.as_bytes().get(after) {
            Some(b'>') => return Some(after + 1),
            Some(c) if c.is_ascii_whitespace() => {
                return lower[after..].find('>').map(|gt| after + gt + 1);
            }
            Some(_) => from = after,
            None => return None,
        }
    }
    None
}

/// Content strictly between the first `<body ...>` and the last `</body>`.
///
/// Input without both markers comes back unchanged.
pub fn extract_body(xhtml: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with the original.
    let lower = xhtml.to_ascii_lowercase();
    let start = find_body_open(&lower);
    let end = lower.rfind("</body>");
    match (start, end) {
        (Some(start), Some(end)) if start <= end => xhtml[start..end].to_string(),
        _ => {
            log::debug!("no body markers, using original text");
            xhtml.to_string()
        }
    }
}

pub fn sanitize(xhtml: &str, math_cleanup: bool) -> String {
    let cleaned = if math_cleanup {
        clean_math(xhtml)
    } else {
        xhtml.to_string()
    };
    let body = extract_body(&cleaned);
    log::debug!("body = |{} ...|", fragment(&body, 100));
    body
}
