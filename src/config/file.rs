//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/autoreadme/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by environment variables and CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > environment > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! [ai]
//! enabled = true
//! model = "gpt-4o-mini"
//! api_key = "sk-..."
//! base_url = "https://api.openai.com/v1"
//!
//! [document]
//! template_style = "standard"   # or "minimal"
//! include_structure = true
//! include_badges = true
//! output = "README.md"
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use super::TemplateStyle;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration.
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// AI generation options
    #[serde(default)]
    pub ai: FileAiConfig,

    /// Document options
    #[serde(default)]
    pub document: FileDocumentConfig,
}

/// AI options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileAiConfig {
    /// Whether AI generation is offered at all
    pub enabled: Option<bool>,

    /// Preferred model identifier
    pub model: Option<String>,

    /// API key (the `AUTOREADME_API_KEY` environment variable takes precedence)
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    pub base_url: Option<String>,
}

/// Document options from the configuration file.
#[derive(Deserialize, Default, Debug)]
pub struct FileDocumentConfig {
    /// Template style (`"standard"` or `"minimal"`)
    pub template_style: Option<TemplateStyle>,

    /// Whether to include the project structure section
    pub include_structure: Option<bool>,

    /// Whether to include badges
    pub include_badges: Option<bool>,

    /// Output file name
    pub output: Option<PathBuf>,
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/autoreadme/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("autoreadme").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    /// If the file exists but is malformed, returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be read
    /// - The config file exists but contains invalid TOML or unexpected value types
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }
}
