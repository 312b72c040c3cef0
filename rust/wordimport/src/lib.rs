pub mod classify;
pub mod clean;
pub mod config;
pub mod container;
pub mod engine;
pub mod entities;
pub mod error;
pub mod images;
pub mod json;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod refine;
pub mod repair;
pub mod transform;
pub mod wordml;
pub mod workarea;

#[cfg(test)]
mod fixtures;

pub use clean::{clean_html_text, MarkupRepair};
pub use config::{ConfigError, ImportConfig, StyleFramework, TextDirection};
pub use engine::WordmlEngine;
pub use error::{ImportError, Result};
pub use images::{AssetStore, FsAssetStore, MemoryAssetStore, Namespace, StoredImage};
pub use json::ImportResponse;
pub use pipeline::{ConversionOutput, Importer};
pub use transform::{TransformEngine, TransformParams};
