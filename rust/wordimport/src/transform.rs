use std::fmt;

use crate::config::{ImportConfig, StyleFramework, TextDirection};
use crate::error::{ImportError, Result};

pub const PASS1_RULES: &str = "wordml2xhtml_pass1";
pub const PASS2_RULES: &str = "wordml2xhtml_pass2";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    First,
    Second,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::First => "pass1",
            Stage::Second => "pass2",
        }
    }

    pub fn rule_set(self) -> &'static str {
        match self {
            Stage::First => PASS1_RULES,
            Stage::Second => PASS2_RULES,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named parameters handed unchanged to both passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformParams {
    pub language: String,
    pub text_direction: TextDirection,
    pub release: String,
    pub base_url: String,
    pub debug: bool,
    pub heading1_level: u8,
    pub style_framework: StyleFramework,
}

impl TransformParams {
    pub fn from_config(config: &ImportConfig) -> Self {
        TransformParams {
            language: config.language.clone(),
            text_direction: config.text_direction,
            release: config.release.clone(),
            base_url: config.base_url(),
            debug: config.retain_artifacts,
            heading1_level: config.heading1_level.clamp(1, 6),
            style_framework: config.style_framework,
        }
    }

    /// The parameters as name/value pairs, for engines that take string parameters.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("language", self.language.clone()),
            ("text_direction", self.text_direction.as_str().to_string()),
            ("release", self.release.clone()),
            ("base_url", self.base_url.clone()),
            ("debug_flag", if self.debug { "1" } else { "0" }.to_string()),
            ("heading1_level", self.heading1_level.to_string()),
            ("style_framework", self.style_framework.as_str().to_string()),
        ]
    }
}

impl Default for TransformParams {
    fn default() -> Self {
        TransformParams::from_config(&ImportConfig::default())
    }
}

/// A text-to-text transformation capability addressed by rule set id.
///
/// Must be deterministic for identical inputs.
pub trait TransformEngine {
    fn has_rule_set(&self, rule_set: &str) -> bool;

    fn transform(
        &self,
        input: &str,
        rule_set: &str,
        params: &TransformParams,
    ) -> std::result::Result<String, String>;
}

/// Fails before any work is done if the engine or one of its rule sets is missing.
pub fn check_engine(engine: Option<&dyn TransformEngine>) -> Result<&dyn TransformEngine> {
    let Some(engine) = engine else {
        log::debug!("transform engine not available");
        return Err(ImportError::TransformUnavailable);
    };
    for stage in [Stage::First, Stage::Second] {
        if !engine.has_rule_set(stage.rule_set()) {
            log::debug!("rule set missing: {}", stage.rule_set());
            return Err(ImportError::StylesheetMissing {
                rule_set: stage.rule_set().to_string(),
            });
        }
    }
    Ok(engine)
}

pub fn run_stage(
    engine: &dyn TransformEngine,
    stage: Stage,
    input: &str,
    params: &TransformParams,
) -> Result<String> {
    log::debug!("{stage} with rule set {}", stage.rule_set());
    let out = engine
        .transform(input, stage.rule_set(), params)
        .map_err(|message| ImportError::TransformExecution { stage, message })?;
    log::debug!(
        "{stage} succeeded, output fragment = {}",
        fragment(&out, 200)
    );
    Ok(out)
}

/// Removes namespace declarations Word-derived output sometimes carries on
/// paragraph elements. Exact substring replacements; idempotent.
pub fn repair_stage_output(xhtml: &str) -> String {
    xhtml
        .replace(" xmlns=\"http://www.w3.org/1999/xhtml\"", "")
        .replace(" xmlns=\"\"", "")
}

/// Both passes back to back, without working storage.
pub fn run_stages(engine: &dyn TransformEngine, merged: &str, params: &TransformParams) -> Result<String> {
    let first = repair_stage_output(&run_stage(engine, Stage::First, merged, params)?);
    run_stage(engine, Stage::Second, &first, params)
}

pub(crate) fn fragment(s: &str, max: usize) -> String {
    s.chars().take(max).filter(|c| *c != '\n').collect()
}
