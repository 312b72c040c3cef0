use crate::classify::{classify, MediaAsset, PartKind, PartSet};
use crate::config::ImportConfig;
use crate::container::Package;
use crate::error::Result;
use crate::images::{AssetStore, ImageStore, Namespace, StoredImage};
use crate::json::ImportResponse;
use crate::merge::merge;
use crate::output::sanitize;
use crate::transform::{
    check_engine, repair_stage_output, run_stage, Stage, TransformEngine, TransformParams,
};
use crate::workarea::{Artifact, WorkArea};

#[derive(Clone, Debug)]
pub struct ConversionOutput {
    pub body_html: String,
    pub images: Vec<StoredImage>,
}

/// Everything in the container that the merge needs, read in one sweep.
struct PackageContents {
    parts: PartSet,
    media: Vec<MediaAsset>,
}

fn read_package(bytes: &[u8]) -> Result<PackageContents> {
    let package = Package::open(bytes)?;
    let mut parts = PartSet::default();
    let mut media = Vec::new();
    for entry in package {
        let entry = entry?;
        match classify(&entry.path) {
            PartKind::Xml(part) => {
                if !parts.insert(part, entry.text()) {
                    log::warn!("duplicate part {}, keeping the first", entry.path);
                }
            }
            PartKind::Media => {
                let path = entry.path.clone();
                match MediaAsset::from_entry(entry) {
                    Some(asset) => media.push(asset),
                    None => log::warn!("unsupported media {path} dropped"),
                }
            }
            PartKind::Ignored => log::debug!("ignoring {}", entry.path),
        }
    }
    Ok(PackageContents { parts, media })
}

/// Converts `.docx` containers into sanitized XHTML body fragments.
pub struct Importer<'a> {
    engine: Option<&'a dyn TransformEngine>,
    store: &'a dyn AssetStore,
    config: &'a ImportConfig,
}

impl<'a> Importer<'a> {
    pub fn new(
        engine: Option<&'a dyn TransformEngine>,
        store: &'a dyn AssetStore,
        config: &'a ImportConfig,
    ) -> Self {
        Importer {
            engine,
            store,
            config,
        }
    }

    pub fn convert(&self, bytes: &[u8], namespace: Namespace) -> Result<ConversionOutput> {
        let engine = check_engine(self.engine)?;
        let contents = read_package(bytes)?;

        let image_store = ImageStore::new(self.store, namespace, &self.config.base_url());
        let images = contents
            .media
            .iter()
            .map(|asset| image_store.store(asset))
            .collect::<Result<Vec<_>>>()?;

        let merged = merge(&contents.parts, &images);
        let params = TransformParams::from_config(self.config);
        let mut work = WorkArea::new(self.config.work_dir(), self.config.retain_artifacts);
        work.stage(Artifact::Merged, merged.as_str())?;

        let first = repair_stage_output(&run_stage(engine, Stage::First, merged.as_str(), &params)?);
        work.stage(Artifact::FirstPass, &first)?;

        let second = run_stage(engine, Stage::Second, &first, &params)?;
        if work.retains() {
            work.stage(Artifact::SecondPass, &second)?;
        }

        let body_html = sanitize(&second, self.config.math_cleanup);
        log::debug!(
            "converted {} bytes into {} bytes of html with {} images",
            bytes.len(),
            body_html.len(),
            images.len()
        );
        Ok(ConversionOutput { body_html, images })
    }

    /// [`Importer::convert`] folded into the caller-facing response shape.
    pub fn respond(&self, bytes: &[u8], namespace: Namespace) -> ImportResponse {
        match self.convert(bytes, namespace) {
            Ok(out) => ImportResponse::html(out.body_html),
            Err(e) => {
                log::warn!("import failed: {e}");
                ImportResponse::from_error(&e)
            }
        }
    }
}
