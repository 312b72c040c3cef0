use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// CSS framework whose class names the second pass adds to block elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFramework {
    #[default]
    Bootstrap,
    Daylight,
    None,
}

impl StyleFramework {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleFramework::Bootstrap => "bootstrap",
            StyleFramework::Daylight => "daylight",
            StyleFramework::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bootstrap" => Some(StyleFramework::Bootstrap),
            "daylight" => Some(StyleFramework::Daylight),
            "none" => Some(StyleFramework::None),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("heading1_level must be between 1 and 6, got {0}")]
    HeadingLevel(u8),
}

/// Per-call conversion settings. Every field has a default so a partial JSON file is enough.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub language: String,
    pub text_direction: TextDirection,
    pub release: String,
    pub base_url: String,
    /// HTML heading level used for Word's "Heading 1" style.
    pub heading1_level: u8,
    pub style_framework: StyleFramework,
    pub math_cleanup: bool,
    /// Keep working files (merged document, pass outputs) for inspection.
    pub retain_artifacts: bool,
    pub work_dir: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            language: "en".to_string(),
            text_direction: TextDirection::Ltr,
            release: concat!("wordimport ", env!("CARGO_PKG_VERSION")).to_string(),
            base_url: "http://localhost/".to_string(),
            heading1_level: 3,
            style_framework: StyleFramework::Bootstrap,
            math_cleanup: true,
            retain_artifacts: false,
            work_dir: None,
        }
    }
}

impl ImportConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: ImportConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=6).contains(&self.heading1_level) {
            return Err(ConfigError::HeadingLevel(self.heading1_level));
        }
        Ok(())
    }

    /// Base URL with exactly one trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ImportConfig::from_json(r#"{"language":"he","text_direction":"rtl"}"#).unwrap();
        assert_eq!(config.language, "he");
        assert_eq!(config.text_direction, TextDirection::Rtl);
        assert_eq!(config.heading1_level, 3);
        assert_eq!(config.style_framework, StyleFramework::Bootstrap);
        assert!(!config.retain_artifacts);
    }

    #[test]
    fn rejects_out_of_range_heading_level() {
        let err = ImportConfig::from_json(r#"{"heading1_level":7}"#).unwrap_err();
        assert!(matches!(err, ConfigError::HeadingLevel(7)));
    }

    #[test]
    fn base_url_gets_single_trailing_slash() {
        let mut config = ImportConfig::default();
        config.base_url = "https://example.org/lms//".to_string();
        assert_eq!(config.base_url(), "https://example.org/lms/");
    }
}
