use std::collections::HashMap;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::transform::TransformParams;

// First pass: WordprocessingML inside the merged document -> linear XHTML.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Outside,
    Document,
    CoreProps,
    Styles,
    DocumentLinks,
    Footnotes,
    FootnoteLinks,
    Images,
    Other,
}

fn section_for(name: &[u8]) -> Option<Section> {
    let section = match name {
        b"wordmlContainer" => Section::Document,
        b"dublinCore" => Section::CoreProps,
        b"styleMap" => Section::Styles,
        b"documentLinks" => Section::DocumentLinks,
        b"footnotesContainer" => Section::Footnotes,
        b"footnoteLinks" => Section::FootnoteLinks,
        b"imagesContainer" => Section::Images,
        b"customProps" | b"settingsLinks" => Section::Other,
        _ => return None,
    };
    Some(section)
}

/// Section opened by a container start tag.
fn container_start(event: &Event) -> Option<Section> {
    match event {
        Event::Start(e) => section_for(e.name().as_ref()),
        _ => None,
    }
}

fn is_container_end(event: &Event) -> bool {
    matches!(event, Event::End(e) if section_for(e.name().as_ref()).is_some())
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| match a.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
        })
}

fn text_of(t: &BytesText) -> String {
    match t.unescape() {
        Ok(v) => v.into_owned(),
        Err(_) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// `<w:b/>` is on, `<w:b w:val="0"/>` and `w:val="false"` are off.
fn toggle(e: &BytesStart) -> bool {
    !matches!(attr(e, b"w:val").as_deref(), Some("0" | "false" | "off" | "none"))
}

/// Lookup tables gathered from the non-body parts before rendering.
#[derive(Debug, Default)]
struct PackageIndex {
    rels: HashMap<String, String>,
    note_rels: HashMap<String, String>,
    images: HashMap<String, String>,
    styles: HashMap<String, String>,
    title: String,
}

impl PackageIndex {
    fn build(xml: &str) -> Result<Self, String> {
        let mut index = PackageIndex::default();
        let mut reader = Reader::from_str(xml);
        let mut section = Section::Outside;
        let mut file: Option<String> = None;
        let mut style: Option<String> = None;
        let mut in_title = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("XML error at byte {}: {e}", reader.buffer_position()))?;
            if let Some(opened) = container_start(&event) {
                section = opened;
                continue;
            }
            if is_container_end(&event) {
                section = Section::Outside;
                continue;
            }
            match event {
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) => match (section, e.name().as_ref()) {
                    (Section::DocumentLinks | Section::FootnoteLinks, b"Relationship") => {
                        if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                            let map = if section == Section::DocumentLinks {
                                &mut index.rels
                            } else {
                                &mut index.note_rels
                            };
                            map.insert(id, target);
                        }
                    }
                    (Section::Images, b"file") => file = attr(&e, b"filename"),
                    (Section::Styles, b"w:style") => style = attr(&e, b"w:styleId"),
                    (Section::Styles, b"w:name") => {
                        if let (Some(id), Some(name)) = (style.as_ref(), attr(&e, b"w:val")) {
                            index.styles.insert(id.clone(), name.to_lowercase());
                        }
                    }
                    (Section::CoreProps, b"dc:title") => in_title = true,
                    _ => {}
                },
                Event::Text(t) => {
                    if let Some(name) = &file {
                        index.images.insert(name.clone(), text_of(&t).trim().to_string());
                    } else if in_title {
                        index.title.push_str(&text_of(&t));
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"file" => file = None,
                    b"w:style" => style = None,
                    b"dc:title" => in_title = false,
                    _ => {}
                },
                _ => {}
            }
        }
        Ok(index)
    }

    /// Stored image URL for a relationship id, if the target was an extracted image.
    fn image_url(&self, rel_id: &str, in_notes: bool) -> Option<&str> {
        let rels = if in_notes { &self.note_rels } else { &self.rels };
        let target = rels.get(rel_id)?;
        let target = target.trim_start_matches("../").trim_start_matches("/word/");
        self.images.get(target).map(String::as_str)
    }

    fn link_target(&self, rel_id: &str, in_notes: bool) -> Option<&str> {
        let rels = if in_notes { &self.note_rels } else { &self.rels };
        rels.get(rel_id).map(String::as_str)
    }

    /// HTML heading level for a paragraph style, counting Heading 1 as `top`.
    fn heading_level(&self, style_id: &str, top: u8) -> Option<u8> {
        let name = self
            .styles
            .get(style_id)
            .cloned()
            .unwrap_or_else(|| style_id.to_lowercase());
        let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        if compact == "title" {
            return Some(top);
        }
        let n: u8 = compact.strip_prefix("heading")?.parse().ok()?;
        if n == 0 {
            return None;
        }
        Some(top.saturating_add(n - 1).min(6))
    }

    fn is_list_style(&self, style_id: &str) -> bool {
        let name = self
            .styles
            .get(style_id)
            .cloned()
            .unwrap_or_else(|| style_id.to_lowercase());
        matches!(
            name.replace(' ', "").as_str(),
            "listparagraph" | "listbullet" | "listnumber"
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RunProps {
    bold: bool,
    italic: bool,
    underline: bool,
    strike: bool,
    sup: bool,
    sub: bool,
}

impl RunProps {
    fn tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.bold {
            tags.push("b");
        }
        if self.italic {
            tags.push("i");
        }
        if self.underline {
            tags.push("u");
        }
        if self.strike {
            tags.push("s");
        }
        if self.sup {
            tags.push("sup");
        } else if self.sub {
            tags.push("sub");
        }
        tags
    }
}

#[derive(Debug, Default)]
struct Para {
    style: Option<String>,
    list: bool,
    align: Option<&'static str>,
    content: String,
}

enum Frame {
    Para(Para),
    Cell { colspan: u32, content: String },
}

struct Renderer<'a> {
    index: &'a PackageIndex,
    heading1_level: u8,
    section: Section,
    body: String,
    notes: String,
    frames: Vec<Frame>,
    run: RunProps,
    in_text: bool,
    links: Vec<bool>,
    alt: String,
    skip_note: bool,
    fallback_depth: usize,
    text_boxes: Vec<(Vec<Frame>, RunProps)>,
    note_numbers: HashMap<String, usize>,
}

impl<'a> Renderer<'a> {
    fn new(index: &'a PackageIndex, params: &TransformParams) -> Self {
        Renderer {
            index,
            heading1_level: params.heading1_level.clamp(1, 6),
            section: Section::Outside,
            body: String::new(),
            notes: String::new(),
            frames: Vec::new(),
            run: RunProps::default(),
            in_text: false,
            links: Vec::new(),
            alt: String::new(),
            skip_note: false,
            fallback_depth: 0,
            text_boxes: Vec::new(),
            note_numbers: HashMap::new(),
        }
    }

    fn in_notes(&self) -> bool {
        self.section == Section::Footnotes
    }

    fn sink(&mut self) -> &mut String {
        match self.frames.last_mut() {
            Some(Frame::Para(p)) => &mut p.content,
            Some(Frame::Cell { content, .. }) => content,
            None if self.section == Section::Footnotes => &mut self.notes,
            None => &mut self.body,
        }
    }

    fn para(&mut self) -> Option<&mut Para> {
        match self.frames.last_mut() {
            Some(Frame::Para(p)) => Some(p),
            _ => None,
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let tags = self.run.tags();
        let sink = self.sink();
        for t in &tags {
            sink.push('<');
            sink.push_str(t);
            sink.push('>');
        }
        sink.push_str(&escape(text));
        for t in tags.iter().rev() {
            sink.push_str("</");
            sink.push_str(t);
            sink.push('>');
        }
    }

    fn push_image(&mut self, rel_id: &str) {
        let in_notes = self.in_notes();
        let index = self.index;
        let Some(url) = index.image_url(rel_id, in_notes) else {
            log::debug!("image {rel_id} has no stored file, skipped");
            return;
        };
        let tag = format!(
            "<img src=\"{}\" alt=\"{}\"/>",
            escape(url),
            escape(self.alt.as_str())
        );
        self.sink().push_str(&tag);
    }

    fn start_link(&mut self, e: &BytesStart) {
        let in_notes = self.in_notes();
        let href = match (attr(e, b"r:id"), attr(e, b"w:anchor")) {
            (Some(id), _) => self.index.link_target(&id, in_notes).map(str::to_string),
            (None, Some(anchor)) => Some(format!("#{anchor}")),
            (None, None) => None,
        };
        match href {
            Some(href) => {
                let tag = format!("<a href=\"{}\">", escape(href.as_str()));
                self.sink().push_str(&tag);
                self.links.push(true);
            }
            None => self.links.push(false),
        }
    }

    fn footnote_reference(&mut self, id: &str) {
        let next = self.note_numbers.len() + 1;
        let n = *self.note_numbers.entry(id.to_string()).or_insert(next);
        let id = escape(id).into_owned();
        let tag = format!("<sup><a href=\"#fn{id}\" id=\"fnref{id}\">{n}</a></sup>");
        self.sink().push_str(&tag);
    }

    fn end_paragraph(&mut self) {
        let Some(Frame::Para(p)) = self.frames.pop() else {
            return;
        };
        let heading = p
            .style
            .as_deref()
            .and_then(|s| self.index.heading_level(s, self.heading1_level));
        let list = p.list || p.style.as_deref().is_some_and(|s| self.index.is_list_style(s));
        let tag = match heading {
            Some(level) => format!("h{level}"),
            None => "p".to_string(),
        };
        let mut html = String::with_capacity(p.content.len() + 32);
        html.push('<');
        html.push_str(&tag);
        if heading.is_none() && list {
            html.push_str(" class=\"listitem\"");
        }
        if let Some(align) = p.align {
            html.push_str(" style=\"text-align:");
            html.push_str(align);
            html.push('"');
        }
        html.push('>');
        html.push_str(&p.content);
        html.push_str("</");
        html.push_str(&tag);
        html.push_str(">\n");
        self.sink().push_str(&html);
    }

    /// Text box paragraphs are written beside the paragraph that anchors the
    /// box, so the anchoring paragraph and everything above it is set aside.
    fn enter_text_box(&mut self) {
        let at = self
            .frames
            .iter()
            .rposition(|f| matches!(f, Frame::Para(_)))
            .unwrap_or(self.frames.len());
        let host = self.frames.split_off(at);
        self.text_boxes.push((host, self.run));
        self.run = RunProps::default();
    }

    fn leave_text_box(&mut self) {
        let Some((host, run)) = self.text_boxes.pop() else {
            return;
        };
        self.frames.extend(host);
        self.run = run;
    }

    fn end_cell(&mut self) {
        let Some(Frame::Cell { colspan, content }) = self.frames.pop() else {
            return;
        };
        let html = if colspan > 1 {
            format!("<td colspan=\"{colspan}\">{content}</td>")
        } else {
            format!("<td>{content}</td>")
        };
        self.sink().push_str(&html);
    }

    fn start(&mut self, e: &BytesStart, empty: bool) {
        match e.name().as_ref() {
            b"w:p" if !empty => self.frames.push(Frame::Para(Para::default())),
            b"w:pStyle" => {
                let style = attr(e, b"w:val");
                if let Some(p) = self.para() {
                    p.style = style;
                }
            }
            b"w:numPr" => {
                if let Some(p) = self.para() {
                    p.list = true;
                }
            }
            b"w:numId" if attr(e, b"w:val").as_deref() == Some("0") => {
                if let Some(p) = self.para() {
                    p.list = false;
                }
            }
            b"w:jc" => {
                let align = match attr(e, b"w:val").as_deref() {
                    Some("center") => Some("center"),
                    Some("right" | "end") => Some("right"),
                    Some("both" | "distribute") => Some("justify"),
                    _ => None,
                };
                if let Some(p) = self.para() {
                    p.align = align;
                }
            }
            b"w:r" if !empty => self.run = RunProps::default(),
            b"w:b" => self.run.bold = toggle(e),
            b"w:i" => self.run.italic = toggle(e),
            b"w:u" => self.run.underline = toggle(e),
            b"w:strike" | b"w:dstrike" => self.run.strike = toggle(e),
            b"w:vertAlign" => {
                let val = attr(e, b"w:val");
                self.run.sup = val.as_deref() == Some("superscript");
                self.run.sub = val.as_deref() == Some("subscript");
            }
            b"w:t" if !empty => self.in_text = true,
            b"w:tab" if !self.frames.is_empty() => self.sink().push('\t'),
            b"w:br" if attr(e, b"w:type").as_deref() != Some("page") => {
                self.sink().push_str("<br/>")
            }
            b"w:cr" => self.sink().push_str("<br/>"),
            b"w:noBreakHyphen" => self.sink().push('-'),
            b"w:hyperlink" if !empty => self.start_link(e),
            b"wp:docPr" => self.alt = attr(e, b"descr").unwrap_or_default(),
            b"a:blip" => {
                if let Some(id) = attr(e, b"r:embed").or_else(|| attr(e, b"r:link")) {
                    self.push_image(&id);
                }
            }
            b"v:imagedata" => {
                if let Some(title) = attr(e, b"o:title") {
                    self.alt = title;
                }
                if let Some(id) = attr(e, b"r:id") {
                    self.push_image(&id);
                }
            }
            b"w:footnoteReference" => {
                if let Some(id) = attr(e, b"w:id") {
                    self.footnote_reference(&id);
                }
            }
            b"w:txbxContent" if !empty => self.enter_text_box(),
            b"w:tbl" if !empty => self.sink().push_str("<table>\n"),
            b"w:tr" if !empty => self.sink().push_str("<tr>"),
            b"w:tc" if !empty => self.frames.push(Frame::Cell {
                colspan: 1,
                content: String::new(),
            }),
            b"w:gridSpan" => {
                let span = attr(e, b"w:val").and_then(|v| v.parse().ok()).unwrap_or(1);
                if let Some(Frame::Cell { colspan, .. }) = self.frames.last_mut() {
                    *colspan = span;
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"w:p" => self.end_paragraph(),
            b"w:t" => self.in_text = false,
            b"w:r" => self.run = RunProps::default(),
            b"w:hyperlink" => {
                if self.links.pop() == Some(true) {
                    self.sink().push_str("</a>");
                }
            }
            b"w:drawing" | b"w:pict" => self.alt.clear(),
            b"w:tc" => self.end_cell(),
            b"w:tr" => self.sink().push_str("</tr>\n"),
            b"w:tbl" => self.sink().push_str("</table>\n"),
            b"w:txbxContent" => self.leave_text_box(),
            _ => {}
        }
    }

    fn render(mut self, xml: &str) -> Result<(String, String), String> {
        let mut reader = Reader::from_str(xml);
        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("XML error at byte {}: {e}", reader.buffer_position()))?;
            if let Some(opened) = container_start(&event) {
                self.section = opened;
                continue;
            }
            if is_container_end(&event) {
                self.section = Section::Outside;
                continue;
            }
            match event {
                Event::Eof => break,
                // mc:Fallback repeats the mc:Choice content for older readers.
                Event::Start(_) if self.fallback_depth > 0 => self.fallback_depth += 1,
                Event::End(_) if self.fallback_depth > 0 => self.fallback_depth -= 1,
                _ if self.fallback_depth > 0 => {}
                Event::Start(e) if e.name().as_ref() == b"mc:Fallback" => self.fallback_depth = 1,
                Event::Start(e) if self.in_notes() && e.name().as_ref() == b"w:footnote" => {
                    // Separator and continuation notes have a w:type.
                    self.skip_note = attr(&e, b"w:type").is_some_and(|t| t != "normal");
                    if !self.skip_note {
                        let id = attr(&e, b"w:id").unwrap_or_default();
                        self.notes.push_str(&format!("<li id=\"fn{}\">", escape(id.as_str())));
                    }
                }
                Event::End(e) if self.in_notes() && e.name().as_ref() == b"w:footnote" => {
                    if !self.skip_note {
                        self.notes.push_str("</li>\n");
                    }
                    self.skip_note = false;
                }
                _ if self.skip_note => {}
                _ if !matches!(self.section, Section::Document | Section::Footnotes) => {}
                Event::Start(e) => self.start(&e, false),
                Event::Empty(e) => self.start(&e, true),
                Event::End(e) => self.end(e.name().as_ref()),
                Event::Text(t) if self.in_text => self.push_text(&text_of(&t)),
                _ => {}
            }
        }
        Ok((self.body, self.notes))
    }
}

/// Renders the merged document as a complete XHTML page.
pub fn to_xhtml(merged: &str, params: &TransformParams) -> Result<String, String> {
    let index = PackageIndex::build(merged)?;
    if !merged.contains("<wordmlContainer>") {
        return Err("no WordprocessingML document in input".to_string());
    }
    let (body, notes) = Renderer::new(&index, params).render(merged)?;

    let mut out = String::with_capacity(body.len() + notes.len() + 512);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" lang=\"{}\" dir=\"{}\">\n<head>\n",
        escape(params.language.as_str()),
        params.text_direction.as_str()
    ));
    out.push_str("<meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\"/>\n");
    out.push_str(&format!(
        "<meta name=\"generator\" content=\"{}\"/>\n",
        escape(params.release.as_str())
    ));
    out.push_str(&format!("<title>{}</title>\n</head>\n<body>\n", escape(index.title.trim())));
    out.push_str(&body);
    if !notes.is_empty() {
        out.push_str("<div class=\"footnotes\">\n<ol>\n");
        out.push_str(&notes);
        out.push_str("</ol>\n</div>\n");
    }
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{PartSet, XmlPart};
    use crate::fixtures::{document_xml, image_paragraph, relationships_xml};
    use crate::images::StoredImage;
    use crate::merge::merge;

    fn merged(parts: &[(XmlPart, String)], images: &[StoredImage]) -> String {
        let mut set = PartSet::default();
        for (p, text) in parts {
            set.insert(*p, text.clone());
        }
        merge(&set, images).xml
    }

    fn body(xhtml: &str) -> &str {
        let start = xhtml.find("<body>\n").unwrap() + "<body>\n".len();
        let end = xhtml.rfind("</body>").unwrap();
        &xhtml[start..end]
    }

    #[test]
    fn paragraphs_and_run_formatting() {
        let doc = document_xml(
            "<w:p><w:r><w:t>Hi</w:t></w:r><w:r><w:rPr><w:b/><w:i w:val=\"0\"/></w:rPr><w:t xml:space=\"preserve\"> there &amp; you</w:t></w:r></w:p>",
        );
        let out = to_xhtml(&merged(&[(XmlPart::Document, doc)], &[]), &TransformParams::default()).unwrap();
        assert_eq!(body(&out), "<p>Hi<b> there &amp; you</b></p>\n");
    }

    #[test]
    fn headings_follow_configured_level() {
        let styles = "<w:styles><w:style w:type=\"paragraph\" w:styleId=\"Heading2\"><w:name w:val=\"heading 2\"/></w:style></w:styles>".to_string();
        let doc = document_xml("<w:p><w:pPr><w:pStyle w:val=\"Heading2\"/></w:pPr><w:r><w:t>Sub</w:t></w:r></w:p>");
        let out = to_xhtml(
            &merged(&[(XmlPart::Document, doc), (XmlPart::Styles, styles)], &[]),
            &TransformParams::default(),
        )
        .unwrap();
        assert_eq!(body(&out), "<h4>Sub</h4>\n");
    }

    #[test]
    fn images_resolve_through_relationships() {
        let image = StoredImage {
            original_name: "image1.png".to_string(),
            unique_name: "image1.png".to_string(),
            url: "http://x/draftfile.php/1/user/draft/2/image1.png".to_string(),
            format: crate::classify::ImageFormat::Png,
        };
        let doc = document_xml(&image_paragraph("rId7", "A cat"));
        let rels = relationships_xml(&[("rId7", "media/image1.png")]);
        let out = to_xhtml(
            &merged(&[(XmlPart::Document, doc), (XmlPart::DocumentRels, rels)], &[image]),
            &TransformParams::default(),
        )
        .unwrap();
        assert_eq!(
            body(&out),
            "<p><img src=\"http://x/draftfile.php/1/user/draft/2/image1.png\" alt=\"A cat\"/></p>\n"
        );
    }

    #[test]
    fn unresolved_images_are_dropped() {
        let doc = document_xml(&image_paragraph("rId9", ""));
        let rels = relationships_xml(&[("rId9", "media/image9.emf")]);
        let out = to_xhtml(
            &merged(&[(XmlPart::Document, doc), (XmlPart::DocumentRels, rels)], &[]),
            &TransformParams::default(),
        )
        .unwrap();
        assert_eq!(body(&out), "<p></p>\n");
    }

    #[test]
    fn tables_and_list_paragraphs() {
        let doc = document_xml(
            "<w:tbl><w:tr><w:tc><w:tcPr><w:gridSpan w:val=\"2\"/></w:tcPr><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:pPr><w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"1\"/></w:numPr></w:pPr><w:r><w:t>item</w:t></w:r></w:p>",
        );
        let out = to_xhtml(&merged(&[(XmlPart::Document, doc)], &[]), &TransformParams::default()).unwrap();
        assert_eq!(
            body(&out),
            "<table>\n<tr><td colspan=\"2\"><p>A</p>\n</td></tr>\n</table>\n<p class=\"listitem\">item</p>\n"
        );
    }

    #[test]
    fn text_box_rendered_once_beside_its_anchor() {
        let box_content = "<w:txbxContent><w:p><w:r><w:t>BOXTEXT</w:t></w:r></w:p></w:txbxContent>";
        let doc = document_xml(&format!(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>before</w:t></w:r>\
             <w:r><w:rPr><w:b/></w:rPr><mc:AlternateContent>\
             <mc:Choice Requires=\"wps\"><w:drawing><wps:wsp><wps:txbx>{box_content}</wps:txbx></wps:wsp></w:drawing></mc:Choice>\
             <mc:Fallback><w:pict><v:shape><v:textbox>{box_content}</v:textbox></v:shape></w:pict></mc:Fallback>\
             </mc:AlternateContent><w:t>after</w:t></w:r></w:p>"
        ));
        let out = to_xhtml(&merged(&[(XmlPart::Document, doc)], &[]), &TransformParams::default()).unwrap();
        assert_eq!(out.matches("BOXTEXT").count(), 1);
        assert!(!out.contains("<p><p>"));
        assert_eq!(body(&out), "<p>BOXTEXT</p>\n<p><b>before</b><b>after</b></p>\n");
    }

    #[test]
    fn footnotes_are_numbered_and_listed() {
        let doc = document_xml("<w:p><w:r><w:t>See</w:t></w:r><w:r><w:footnoteReference w:id=\"2\"/></w:r></w:p>");
        let notes = "<w:footnotes xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
            <w:footnote w:type=\"separator\" w:id=\"-1\"><w:p><w:r><w:separator/></w:r></w:p></w:footnote>\
            <w:footnote w:id=\"2\"><w:p><w:r><w:t>Note</w:t></w:r></w:p></w:footnote></w:footnotes>"
            .to_string();
        let out = to_xhtml(
            &merged(&[(XmlPart::Document, doc), (XmlPart::Footnotes, notes)], &[]),
            &TransformParams::default(),
        )
        .unwrap();
        assert!(out.contains("<p>See<sup><a href=\"#fn2\" id=\"fnref2\">1</a></sup></p>"));
        assert!(out.contains("<div class=\"footnotes\">\n<ol>\n<li id=\"fn2\"><p>Note</p>\n</li>\n</ol>"));
    }

    #[test]
    fn head_carries_title_language_and_direction() {
        let core = "<cp:coreProperties xmlns:cp=\"urn:cp\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\"><dc:title>Report</dc:title></cp:coreProperties>".to_string();
        let doc = document_xml("");
        let mut params = TransformParams::default();
        params.language = "he".to_string();
        params.text_direction = crate::config::TextDirection::Rtl;
        let out = to_xhtml(
            &merged(&[(XmlPart::Document, doc), (XmlPart::CoreProps, core)], &[]),
            &params,
        )
        .unwrap();
        assert!(out.contains("lang=\"he\" dir=\"rtl\""));
        assert!(out.contains("<title>Report</title>"));
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(to_xhtml("<pass1Container><wordmlContainer><w:p></pass1Container>", &TransformParams::default()).is_err());
    }
}
