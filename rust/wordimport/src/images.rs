use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::classify::{ImageFormat, MediaAsset};
use crate::error::{ImportError, Result};

const SUFFIX_LEN: usize = 6;
const MAX_ATTEMPTS: usize = 64;

/// Destination area for extracted images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub context_id: u64,
    pub item_id: u64,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.context_id, self.item_id)
    }
}

/// Durable storage for image bytes.
///
/// `exists` followed by `put` is not atomic. Implementations that can detect
/// a clobbered name should fail `put` with `ErrorKind::AlreadyExists`.
pub trait AssetStore {
    fn exists(&self, namespace: &Namespace, name: &str) -> bool;
    fn put(&self, namespace: &Namespace, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// One directory per namespace: `{root}/{context_id}/{item_id}/{name}`.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsAssetStore { root: root.into() }
    }

    pub fn path_for(&self, namespace: &Namespace, name: &str) -> PathBuf {
        self.root
            .join(namespace.context_id.to_string())
            .join(namespace.item_id.to_string())
            .join(name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetStore for FsAssetStore {
    fn exists(&self, namespace: &Namespace, name: &str) -> bool {
        self.path_for(namespace, name).exists()
    }

    fn put(&self, namespace: &Namespace, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(namespace, name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        file.write_all(bytes)
    }
}

#[derive(Default)]
pub struct MemoryAssetStore {
    files: Mutex<HashMap<(Namespace, String), Vec<u8>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, namespace: &Namespace, name: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.get(&(*namespace, name.to_string())).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetStore for MemoryAssetStore {
    fn exists(&self, namespace: &Namespace, name: &str) -> bool {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.contains_key(&(*namespace, name.to_string()))
    }

    fn put(&self, namespace: &Namespace, name: &str, bytes: &[u8]) -> io::Result<()> {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let key = (*namespace, name.to_string());
        if files.contains_key(&key) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, name.to_string()));
        }
        files.insert(key, bytes.to_vec());
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredImage {
    pub original_name: String,
    pub unique_name: String,
    pub url: String,
    pub format: ImageFormat,
}

/// Persists media assets under names that are free in the namespace.
pub struct ImageStore<'a> {
    store: &'a dyn AssetStore,
    namespace: Namespace,
    base_url: String,
}

impl<'a> ImageStore<'a> {
    pub fn new(store: &'a dyn AssetStore, namespace: Namespace, base_url: &str) -> Self {
        ImageStore {
            store,
            namespace,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        }
    }

    pub fn url_for(&self, name: &str) -> String {
        format!(
            "{}draftfile.php/{}/user/draft/{}/{}",
            self.base_url, self.namespace.context_id, self.namespace.item_id, name
        )
    }

    pub fn store(&self, asset: &MediaAsset) -> Result<StoredImage> {
        let mut candidate = asset.original_name.clone();
        for _ in 0..MAX_ATTEMPTS {
            if self.store.exists(&self.namespace, &candidate) {
                candidate = with_suffix(&asset.original_name);
                continue;
            }
            match self.store.put(&self.namespace, &candidate, &asset.bytes) {
                Ok(()) => {
                    log::debug!(
                        "stored {} as {} in {}",
                        asset.original_name,
                        candidate,
                        self.namespace
                    );
                    return Ok(StoredImage {
                        original_name: asset.original_name.clone(),
                        url: self.url_for(&candidate),
                        unique_name: candidate,
                        format: asset.format,
                    });
                }
                // Another writer took the name between the check and the write.
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    candidate = with_suffix(&asset.original_name);
                }
                Err(source) => {
                    return Err(ImportError::StorageWrite {
                        name: candidate,
                        source,
                    })
                }
            }
        }
        Err(ImportError::StorageWrite {
            name: asset.original_name.clone(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "no free file name"),
        })
    }
}

/// `image1.png` -> `image1_Xy12ab.png`
fn with_suffix(name: &str) -> String {
    let suffix: String = std::iter::repeat_with(fastrand::alphanumeric)
        .take(SUFFIX_LEN)
        .collect();
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{suffix}.{ext}"),
        None => format!("{name}_{suffix}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: Namespace = Namespace {
        context_id: 5,
        item_id: 77,
    };

    fn png(name: &str) -> MediaAsset {
        MediaAsset {
            original_name: name.to_string(),
            extension: "png".to_string(),
            format: ImageFormat::Png,
            bytes: b"\x89PNG".to_vec(),
        }
    }

    #[test]
    fn first_store_keeps_original_name() {
        let backend = MemoryAssetStore::new();
        let images = ImageStore::new(&backend, NS, "https://lms.example/");
        let stored = images.store(&png("image1.png")).unwrap();
        assert_eq!(stored.unique_name, "image1.png");
        assert_eq!(
            stored.url,
            "https://lms.example/draftfile.php/5/user/draft/77/image1.png"
        );
        assert_eq!(backend.get(&NS, "image1.png").unwrap(), b"\x89PNG");
    }

    #[test]
    fn identical_names_get_distinct_unique_names() {
        let backend = MemoryAssetStore::new();
        let images = ImageStore::new(&backend, NS, "https://lms.example");
        let a = images.store(&png("image1.png")).unwrap();
        let b = images.store(&png("image1.png")).unwrap();
        assert_ne!(a.unique_name, b.unique_name);
        assert!(b.unique_name.starts_with("image1_"));
        assert!(b.unique_name.ends_with(".png"));
        assert_eq!(b.unique_name.len(), "image1_.png".len() + SUFFIX_LEN);
        assert!(backend.exists(&NS, &a.unique_name));
        assert!(backend.exists(&NS, &b.unique_name));
    }

    #[test]
    fn namespaces_do_not_collide() {
        let backend = MemoryAssetStore::new();
        let other = Namespace {
            context_id: 5,
            item_id: 78,
        };
        let a = ImageStore::new(&backend, NS, "http://x/").store(&png("a.png")).unwrap();
        let b = ImageStore::new(&backend, other, "http://x/").store(&png("a.png")).unwrap();
        assert_eq!(a.unique_name, b.unique_name);
        assert_ne!(a.url, b.url);
    }

    struct RacyStore {
        inner: MemoryAssetStore,
    }

    impl AssetStore for RacyStore {
        // Always claims the name is free, so only `put` detects the clash.
        fn exists(&self, _: &Namespace, _: &str) -> bool {
            false
        }

        fn put(&self, namespace: &Namespace, name: &str, bytes: &[u8]) -> io::Result<()> {
            self.inner.put(namespace, name, bytes)
        }
    }

    #[test]
    fn lost_race_retries_with_new_name() {
        let backend = RacyStore {
            inner: MemoryAssetStore::new(),
        };
        let images = ImageStore::new(&backend, NS, "http://x/");
        let a = images.store(&png("img.png")).unwrap();
        let b = images.store(&png("img.png")).unwrap();
        assert_ne!(a.unique_name, b.unique_name);
        assert_eq!(backend.inner.len(), 2);
    }

    struct BrokenStore;

    impl AssetStore for BrokenStore {
        fn exists(&self, _: &Namespace, _: &str) -> bool {
            false
        }

        fn put(&self, _: &Namespace, _: &str, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn write_failure_is_fatal() {
        let err = ImageStore::new(&BrokenStore, NS, "http://x/")
            .store(&png("img.png"))
            .unwrap_err();
        assert!(matches!(err, ImportError::StorageWrite { .. }));
    }

    #[test]
    fn fs_store_writes_under_namespace_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsAssetStore::new(dir.path());
        let images = ImageStore::new(&backend, NS, "http://x/");
        let a = images.store(&png("pic.png")).unwrap();
        let b = images.store(&png("pic.png")).unwrap();
        assert!(dir.path().join("5/77/pic.png").is_file());
        assert!(backend.path_for(&NS, &b.unique_name).is_file());
        assert_ne!(a.unique_name, b.unique_name);
    }

    #[test]
    fn suffix_goes_before_extension() {
        let name = with_suffix("photo.final.jpeg");
        assert!(name.starts_with("photo.final_"));
        assert!(name.ends_with(".jpeg"));
        assert!(with_suffix("noext").starts_with("noext_"));
    }
}
