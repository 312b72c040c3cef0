use crate::container::PackageEntry;

/// The XML parts the first transform pass knows how to address.
///
/// Declaration order is merge order: the pass addresses parts by container
/// element name in this sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XmlPart {
    Document,
    CoreProps,
    CustomProps,
    Styles,
    DocumentRels,
    Footnotes,
    FootnoteRels,
    SettingsRels,
}

impl XmlPart {
    pub const ORDER: [XmlPart; 8] = [
        XmlPart::Document,
        XmlPart::CoreProps,
        XmlPart::CustomProps,
        XmlPart::Styles,
        XmlPart::DocumentRels,
        XmlPart::Footnotes,
        XmlPart::FootnoteRels,
        XmlPart::SettingsRels,
    ];

    pub fn path(self) -> &'static str {
        match self {
            XmlPart::Document => "word/document.xml",
            XmlPart::CoreProps => "docProps/core.xml",
            XmlPart::CustomProps => "docProps/custom.xml",
            XmlPart::Styles => "word/styles.xml",
            XmlPart::DocumentRels => "word/_rels/document.xml.rels",
            XmlPart::Footnotes => "word/footnotes.xml",
            XmlPart::FootnoteRels => "word/_rels/footnotes.xml.rels",
            XmlPart::SettingsRels => "word/_rels/settings.xml.rels",
        }
    }

    /// Name of the element wrapping this part in the merged document.
    pub fn container(self) -> &'static str {
        match self {
            XmlPart::Document => "wordmlContainer",
            XmlPart::CoreProps => "dublinCore",
            XmlPart::CustomProps => "customProps",
            XmlPart::Styles => "styleMap",
            XmlPart::DocumentRels => "documentLinks",
            XmlPart::Footnotes => "footnotesContainer",
            XmlPart::FootnoteRels => "footnoteLinks",
            XmlPart::SettingsRels => "settingsLinks",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn from_path(path: &str) -> Option<Self> {
        XmlPart::ORDER.into_iter().find(|p| p.path() == path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartKind {
    Xml(XmlPart),
    Media,
    Ignored,
}

pub fn classify(path: &str) -> PartKind {
    if path.contains("media") {
        return PartKind::Media;
    }
    match XmlPart::from_path(path) {
        Some(part) => PartKind::Xml(part),
        None => PartKind::Ignored,
    }
}

/// Image formats a browser can display inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Gif,
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "gif" => Some(ImageFormat::Gif),
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Gif => "image/gif",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

#[derive(Clone, Debug)]
pub struct MediaAsset {
    /// Base file name inside the package, e.g. `image1.png`.
    pub original_name: String,
    /// Lowercased extension.
    pub extension: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl MediaAsset {
    /// Returns `None` for anything that is not a gif, png or jpeg.
    pub fn from_entry(entry: PackageEntry) -> Option<Self> {
        let original_name = entry.path.rsplit('/').next().unwrap_or_default().to_string();
        if original_name.is_empty() || original_name.starts_with('.') {
            return None;
        }
        let extension = original_name.rsplit_once('.')?.1.to_ascii_lowercase();
        let format = ImageFormat::from_extension(&extension)?;
        Some(MediaAsset {
            original_name,
            extension,
            format,
            bytes: entry.data,
        })
    }
}

/// The XML parts found in a package, one slot per [`XmlPart`].
#[derive(Clone, Debug, Default)]
pub struct PartSet {
    parts: [Option<String>; 8],
}

impl PartSet {
    /// Keeps the first text seen for a part; returns false for a duplicate.
    pub fn insert(&mut self, part: XmlPart, text: String) -> bool {
        let slot = &mut self.parts[part.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(text);
        true
    }

    pub fn get(&self, part: XmlPart) -> Option<&str> {
        self.parts[part.index()].as_deref()
    }

    /// Present parts in merge order.
    pub fn iter(&self) -> impl Iterator<Item = (XmlPart, &str)> {
        XmlPart::ORDER
            .into_iter()
            .filter_map(|p| self.get(p).map(|text| (p, text)))
    }
}
