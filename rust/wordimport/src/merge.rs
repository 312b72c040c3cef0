use lazy_static::lazy_static;
use quick_xml::escape::escape;
use regex::Regex;

use crate::classify::PartSet;
use crate::images::StoredImage;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
pub const ROOT: &str = "pass1Container";
pub const IMAGES: &str = "imagesContainer";

lazy_static! {
    static ref DECLARATION: Regex = Regex::new(r"<\?xml\s[^>]*\?>").unwrap();
}

/// The single synthetic document fed to the first transform pass.
#[derive(Clone, Debug)]
pub struct MergedDocument {
    pub xml: String,
}

impl MergedDocument {
    pub fn as_str(&self) -> &str {
        &self.xml
    }
}

pub fn strip_declaration(xml: &str) -> String {
    DECLARATION.replace_all(xml, "").into_owned()
}

fn image_reference(out: &mut String, image: &StoredImage) {
    out.push_str("<file filename=\"media/");
    out.push_str(&escape(image.original_name.as_str()));
    out.push_str("\" mime-type=\"");
    out.push_str(image.format.mime());
    out.push_str("\">");
    out.push_str(&escape(image.url.as_str()));
    out.push_str("</file>\n");
}

pub fn merge(parts: &PartSet, images: &[StoredImage]) -> MergedDocument {
    let size: usize = parts.iter().map(|(_, text)| text.len() + 64).sum();
    let mut xml = String::with_capacity(size + images.len() * 160 + 128);
    xml.push_str(XML_DECLARATION);
    xml.push_str("\n<");
    xml.push_str(ROOT);
    xml.push_str(">\n");

    for (part, text) in parts.iter() {
        let name = part.container();
        xml.push('<');
        xml.push_str(name);
        xml.push('>');
        xml.push_str(&strip_declaration(text));
        xml.push_str("</");
        xml.push_str(name);
        xml.push_str(">\n");
    }

    xml.push('<');
    xml.push_str(IMAGES);
    xml.push_str(">\n");
    for image in images {
        image_reference(&mut xml, image);
    }
    xml.push_str("</");
    xml.push_str(IMAGES);
    xml.push_str(">\n</");
    xml.push_str(ROOT);
    xml.push('>');

    log::debug!(
        "merged {} parts and {} images into {} bytes",
        parts.iter().count(),
        images.len(),
        xml.len()
    );
    MergedDocument { xml }
}
