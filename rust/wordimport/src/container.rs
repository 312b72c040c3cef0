use std::io::{Cursor, Read};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{ImportError, Result};

/// One archive member, fully read.
#[derive(Clone, Debug)]
pub struct PackageEntry {
    pub path: String,
    pub data: Vec<u8>,
    pub size: u64,
}

impl PackageEntry {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// An opened `.docx` container. Iterating drains it in archive order, once.
pub struct Package<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    next: usize,
}

impl<'a> Package<'a> {
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(ImportError::ContainerOpen)?;
        log::debug!("opened container with {} entries", archive.len());
        Ok(Package { archive, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    fn read_entry(&mut self, index: usize) -> Result<PackageEntry> {
        let mut file = self
            .archive
            .by_index(index)
            .map_err(|source| ImportError::ContainerEntry {
                name: format!("#{index}"),
                source,
            })?;
        let path = file.name().to_string();
        let size = file.size();
        let mut data = Vec::with_capacity(size.min(64 * 1024 * 1024) as usize);
        file.read_to_end(&mut data)
            .map_err(|e| ImportError::ContainerEntry {
                name: path.clone(),
                source: ZipError::Io(e),
            })?;
        log::debug!("entry {path}, size = {size}");
        Ok(PackageEntry { path, data, size })
    }
}

impl Iterator for Package<'_> {
    type Item = Result<PackageEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.archive.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.read_entry(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.archive.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::package;

    #[test]
    fn yields_entries_in_archive_order() {
        let bytes = package(&[
            ("word/document.xml", b"<w:document/>".as_slice()),
            ("word/media/image1.png", b"\x89PNG".as_slice()),
        ]);
        let entries: Vec<PackageEntry> = Package::open(&bytes)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "word/document.xml");
        assert_eq!(entries[0].text(), "<w:document/>");
        assert_eq!(entries[1].size, 4);
    }

    #[test]
    fn truncated_bytes_are_not_a_container() {
        let bytes = package(&[("word/document.xml", b"<w:document/>".as_slice())]);
        let err = Package::open(&bytes[..bytes.len() / 2]).err().unwrap();
        assert!(matches!(err, ImportError::ContainerOpen(_)));
    }

    #[test]
    fn iteration_is_single_pass() {
        let bytes = package(&[("a.xml", b"<a/>".as_slice())]);
        let mut pkg = Package::open(&bytes).unwrap();
        assert!(pkg.next().is_some());
        assert!(pkg.next().is_none());
        assert!(pkg.next().is_none());
    }
}
