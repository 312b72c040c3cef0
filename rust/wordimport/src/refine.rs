use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::config::StyleFramework;
use crate::transform::TransformParams;

// Second pass: structural clean-up of the first-pass XHTML.
//  - runs of `<p class="listitem">` siblings become one `<ul>` of `<li>`
//  - empty paragraphs are dropped
//  - tables get the class of the configured style framework

type WriteResult = std::result::Result<(), quick_xml::Error>;

fn table_class(framework: StyleFramework) -> Option<&'static str> {
    match framework {
        StyleFramework::Bootstrap => Some("table table-bordered"),
        StyleFramework::Daylight => Some("d2l-table"),
        StyleFramework::None => None,
    }
}

fn is_list_item(e: &BytesStart) -> bool {
    e.name().as_ref() == b"p"
        && e
            .attributes()
            .flatten()
            .any(|a| a.key.as_ref() == b"class" && a.value.as_ref() == b"listitem")
}

/// Copy of `e` renamed to `name`, minus its class attribute.
fn renamed_without_class(e: &BytesStart, name: &str) -> BytesStart<'static> {
    let mut out = BytesStart::new(name.to_string());
    for a in e.attributes().flatten() {
        if a.key.as_ref() != b"class" {
            out.push_attribute(a);
        }
    }
    out
}

/// A paragraph start held back until we know it has content.
struct Pending {
    start: BytesStart<'static>,
    space: Vec<BytesText<'static>>,
}

struct Refiner {
    stack: Vec<Vec<u8>>,
    list_at: Option<usize>,
    pending: Option<Pending>,
    table_class: Option<&'static str>,
}

impl Refiner {
    fn new(params: &TransformParams) -> Self {
        Refiner {
            stack: Vec::new(),
            list_at: None,
            pending: None,
            table_class: table_class(params.style_framework),
        }
    }

    fn flush<W: std::io::Write>(&mut self, w: &mut Writer<W>) -> WriteResult {
        if let Some(p) = self.pending.take() {
            w.write_event(Event::Start(p.start))?;
            for t in p.space {
                w.write_event(Event::Text(t))?;
            }
        }
        Ok(())
    }

    fn close_list<W: std::io::Write>(&mut self, w: &mut Writer<W>) -> WriteResult {
        if self.list_at.take().is_some() {
            w.write_event(Event::End(BytesEnd::new("ul")))?;
        }
        Ok(())
    }

    /// Closes an open list when content arrives at the list's own depth.
    fn leave_list<W: std::io::Write>(&mut self, w: &mut Writer<W>) -> WriteResult {
        if self.list_at == Some(self.stack.len()) {
            self.close_list(w)?;
        }
        Ok(())
    }

    fn decorate<'e>(&self, e: BytesStart<'e>) -> BytesStart<'e> {
        let Some(class) = self.table_class.filter(|_| e.name().as_ref() == b"table") else {
            return e;
        };
        let existing = e
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == b"class")
            .map(|a| String::from_utf8_lossy(&a.value).into_owned());
        let mut out = renamed_without_class(&e, "table");
        match existing {
            Some(existing) => out.push_attribute(("class", format!("{existing} {class}").as_str())),
            None => out.push_attribute(("class", class)),
        }
        out
    }

    fn start<W: std::io::Write>(&mut self, e: BytesStart, w: &mut Writer<W>) -> WriteResult {
        self.flush(w)?;
        let depth = self.stack.len();
        if is_list_item(&e) {
            if self.list_at != Some(depth) {
                self.close_list(w)?;
                w.write_event(Event::Start(BytesStart::new("ul")))?;
                self.list_at = Some(depth);
            }
            w.write_event(Event::Start(renamed_without_class(&e, "li")))?;
            self.stack.push(b"li".to_vec());
            return Ok(());
        }
        self.leave_list(w)?;
        self.stack.push(e.name().as_ref().to_vec());
        if e.name().as_ref() == b"p" {
            self.pending = Some(Pending {
                start: e.into_owned(),
                space: Vec::new(),
            });
            return Ok(());
        }
        w.write_event(Event::Start(self.decorate(e)))
    }

    fn empty<W: std::io::Write>(&mut self, e: BytesStart, w: &mut Writer<W>) -> WriteResult {
        self.flush(w)?;
        if e.name().as_ref() == b"p" {
            return Ok(());
        }
        self.leave_list(w)?;
        w.write_event(Event::Empty(self.decorate(e)))
    }

    fn end<W: std::io::Write>(&mut self, e: BytesEnd, w: &mut Writer<W>) -> WriteResult {
        if self.pending.take().is_some() {
            self.stack.pop();
            return Ok(());
        }
        self.leave_list(w)?;
        let name = match self.stack.pop() {
            Some(name) => String::from_utf8_lossy(&name).into_owned(),
            None => String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        };
        w.write_event(Event::End(BytesEnd::new(name)))
    }

    fn text<W: std::io::Write>(&mut self, t: BytesText, w: &mut Writer<W>) -> WriteResult {
        let blank = t.iter().all(|b| b.is_ascii_whitespace());
        if blank {
            if let Some(p) = self.pending.as_mut() {
                p.space.push(t.into_owned());
                return Ok(());
            }
            return w.write_event(Event::Text(t));
        }
        self.flush(w)?;
        self.leave_list(w)?;
        w.write_event(Event::Text(t))
    }

    fn handle<W: std::io::Write>(&mut self, event: Event, w: &mut Writer<W>) -> WriteResult {
        match event {
            Event::Start(e) => self.start(e, w),
            Event::Empty(e) => self.empty(e, w),
            Event::End(e) => self.end(e, w),
            Event::Text(t) => self.text(t, w),
            other => {
                self.flush(w)?;
                w.write_event(other)
            }
        }
    }
}

pub fn refine(xhtml: &str, params: &TransformParams) -> Result<String, String> {
    let mut reader = Reader::from_str(xhtml);
    let mut writer = Writer::new(Vec::with_capacity(xhtml.len() + 256));
    let mut refiner = Refiner::new(params);
    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("XML error at byte {}: {e}", reader.buffer_position()))?;
        if let Event::Eof = event {
            break;
        }
        refiner
            .handle(event, &mut writer)
            .map_err(|e| format!("cannot write output: {e}"))?;
    }
    refiner
        .close_list(&mut writer)
        .map_err(|e| format!("cannot write output: {e}"))?;
    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(xhtml: &str, framework: StyleFramework) -> String {
        let params = TransformParams {
            style_framework: framework,
            ..TransformParams::default()
        };
        refine(xhtml, &params).unwrap()
    }

    #[test]
    fn consecutive_list_items_share_one_list() {
        let html = "<body><p>a</p>\n<p class=\"listitem\">x</p>\n<p class=\"listitem\">y</p>\n<p>b</p></body>";
        assert_eq!(
            run(html, StyleFramework::None),
            "<body><p>a</p>\n<ul><li>x</li>\n<li>y</li>\n</ul><p>b</p></body>"
        );
    }

    #[test]
    fn list_closes_at_end_of_container() {
        let html = "<body><p class=\"listitem\">x</p></body>";
        assert_eq!(run(html, StyleFramework::None), "<body><ul><li>x</li></ul></body>");
    }

    #[test]
    fn empty_paragraphs_are_dropped() {
        let html = "<body><p></p><p> </p><p/><p> <b>x</b></p></body>";
        assert_eq!(run(html, StyleFramework::None), "<body><p> <b>x</b></p></body>");
    }

    #[test]
    fn tables_get_framework_class() {
        let html = "<body><table><tr><td>1</td></tr></table></body>";
        assert_eq!(
            run(html, StyleFramework::Bootstrap),
            "<body><table class=\"table table-bordered\"><tr><td>1</td></tr></table></body>"
        );
        assert_eq!(
            run(html, StyleFramework::Daylight),
            "<body><table class=\"d2l-table\"><tr><td>1</td></tr></table></body>"
        );
        assert_eq!(run(html, StyleFramework::None), html);
    }

    #[test]
    fn declaration_and_attributes_pass_through() {
        let html = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<html lang=\"en\"><body><p style=\"text-align:center\">a &amp; b</p></body></html>";
        assert_eq!(run(html, StyleFramework::None), html);
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(refine("<body><p></body>", &TransformParams::default()).is_err());
    }
}
