use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::transform::Stage;

/// Everything that can end a conversion call. None of these are retried internally.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("cannot open Word container: {0}")]
    ContainerOpen(#[source] zip::result::ZipError),

    #[error("cannot read container entry {name}: {source}")]
    ContainerEntry {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("no transform engine available")]
    TransformUnavailable,

    #[error("transform rule set not found: {rule_set}")]
    StylesheetMissing { rule_set: String },

    #[error("{stage} transformation failed: {message}")]
    TransformExecution { stage: Stage, message: String },

    #[error("cannot store image {name}: {source}")]
    StorageWrite {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot write working file {}: {source}", path.display())]
    WorkArea {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ImportError {
    /// Short name of the pipeline step that failed, used in error descriptors.
    pub fn stage(&self) -> &'static str {
        match self {
            ImportError::ContainerOpen(_) | ImportError::ContainerEntry { .. } => "container",
            ImportError::TransformUnavailable | ImportError::StylesheetMissing { .. } => "setup",
            ImportError::TransformExecution { stage, .. } => stage.name(),
            ImportError::StorageWrite { .. } => "images",
            ImportError::WorkArea { .. } => "workarea",
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
