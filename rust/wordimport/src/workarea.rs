use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Artifact {
    Merged,
    FirstPass,
    SecondPass,
}

impl Artifact {
    pub fn suffix(self) -> &'static str {
        match self {
            Artifact::Merged => "wml",
            Artifact::FirstPass => "if1",
            Artifact::SecondPass => "xhtml",
        }
    }
}

/// Transient working files for one conversion, sharing a random prefix.
///
/// Everything staged is deleted on drop unless `retain` is set.
pub struct WorkArea {
    dir: PathBuf,
    prefix: String,
    retain: bool,
    created: Vec<PathBuf>,
}

impl WorkArea {
    pub fn new(dir: impl Into<PathBuf>, retain: bool) -> Self {
        let token: String = std::iter::repeat_with(fastrand::alphanumeric).take(12).collect();
        WorkArea {
            dir: dir.into(),
            prefix: format!("wordimport_{token}"),
            retain,
            created: Vec::new(),
        }
    }

    pub fn retains(&self) -> bool {
        self.retain
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.dir.join(format!("{}.{}", self.prefix, artifact.suffix()))
    }

    pub fn stage(&mut self, artifact: Artifact, contents: &str) -> Result<PathBuf> {
        let path = self.path(artifact);
        if let Err(source) = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, contents)) {
            return Err(ImportError::WorkArea { path, source });
        }
        log::debug!("{} bytes saved to {}", contents.len(), path.display());
        if !self.created.contains(&path) {
            self.created.push(path.clone());
        }
        Ok(path)
    }

    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("cannot delete working file {}: {e}", path.display());
        }
    }
}

impl Drop for WorkArea {
    fn drop(&mut self) {
        if self.retain {
            for path in &self.created {
                log::debug!("keeping {}", path.display());
            }
            return;
        }
        for path in self.created.drain(..) {
            WorkArea::discard(&path);
        }
    }
}
