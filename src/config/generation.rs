//! Resolved generation settings.
//!
//! These values are assembled once (CLI > environment > config file >
//! defaults) and passed explicitly into the orchestrator, so nothing in the
//! pipeline reads configuration on its own.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::ai::client::DEFAULT_BASE_URL;

/// Model tried first when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Output file name, relative to the project root.
pub const DEFAULT_OUTPUT_FILE: &str = "README.md";

/// How the document should be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyChoice {
    /// Delegate prose generation to the AI endpoint
    Ai,

    /// Assemble the document from built-in templates
    Template,
}

/// Layout of the templated document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    /// Every section: badges, scripts table, contributing, acknowledgments
    #[default]
    Standard,

    /// Title, description, features, getting started and license only
    Minimal,
}

/// Options controlling templated output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateOptions {
    pub style: TemplateStyle,
    pub include_badges: bool,
    pub include_structure: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            style: TemplateStyle::Standard,
            include_badges: true,
            include_structure: true,
        }
    }
}

/// Fully resolved settings for one generation request.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    /// Whether the AI strategy may be used at all
    pub ai_enabled: bool,

    /// Model tried first by the AI strategy
    pub preferred_model: String,

    /// Raw API key; validated before any request
    pub api_key: Option<String>,

    /// Base URL of the chat completions API
    pub base_url: String,

    /// Templated output options
    pub template: TemplateOptions,

    /// Output file, relative to the project root unless absolute
    pub output_file: PathBuf,

    /// Strategy fixed in advance; `None` asks the user
    pub strategy: Option<StrategyChoice>,

    /// Produce the document without writing it
    pub dry_run: bool,
}

impl GenerationConfig {
    /// Where the document for `root` will be written.
    #[must_use]
    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_file)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            preferred_model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            template: TemplateOptions::default(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            strategy: None,
            dry_run: false,
        }
    }
}
