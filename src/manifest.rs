//! `package.json` reading.
//!
//! The manifest is optional. A missing or malformed file never stops the
//! pipeline: the reader logs the problem and falls back to defaults, naming
//! the project after its folder.

use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value, from_str};
use thiserror::Error;
use tracing::{debug, warn};

/// File name of the manifest looked up at the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Name used when neither the manifest nor the folder provides one.
const FALLBACK_PROJECT_NAME: &str = "project";

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fields extracted from a `package.json` file.
///
/// Name lists keep the manifest's declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Project name. Never empty once returned by [`DependencyReader::read`];
    /// [`parse_manifest`] leaves it empty when the manifest has none.
    pub name: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub repository_url: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub homepage: Option<String>,
    pub dependency_names: Vec<String>,
    pub dev_dependency_names: Vec<String>,
    pub script_names: Vec<String>,
}

/// Package manager inferred from the lockfile present at the project root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Detect the package manager from lockfiles in `root`.
    ///
    /// Checked in order: Bun, pnpm, Yarn. Anything else, including a plain
    /// `package-lock.json`, is treated as npm.
    #[must_use]
    pub fn detect(root: &Path) -> Self {
        let lockfiles: [(&[&str], Self); 3] = [
            (&["bun.lockb", "bun.lock"], Self::Bun),
            (&["pnpm-lock.yaml"], Self::Pnpm),
            (&["yarn.lock"], Self::Yarn),
        ];

        lockfiles
            .iter()
            .find(|(files, _)| files.iter().any(|f| root.join(f).is_file()))
            .map_or(Self::Npm, |(_, manager)| *manager)
    }

    /// Command used to install dependencies.
    #[must_use]
    pub const fn install_command(self) -> &'static str {
        match self {
            Self::Npm => "npm install",
            Self::Yarn => "yarn install",
            Self::Pnpm => "pnpm install",
            Self::Bun => "bun install",
        }
    }

    /// Command used to run a script declared in the manifest.
    #[must_use]
    pub fn run_command(self, script: &str) -> String {
        match (self, script) {
            (Self::Npm, "start" | "test") => format!("npm {script}"),
            (Self::Npm, _) => format!("npm run {script}"),
            (Self::Yarn, _) => format!("yarn {script}"),
            (Self::Pnpm, _) => format!("pnpm {script}"),
            (Self::Bun, _) => format!("bun run {script}"),
        }
    }
}

impl Display for PackageManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Bun => "bun",
        };

        f.write_str(name)
    }
}

/// Reads the project manifest and applies defaults.
pub struct DependencyReader;

impl DependencyReader {
    /// Read `package.json` from `root`, falling back to defaults.
    ///
    /// # Arguments
    ///
    /// * `root` - The project root directory
    ///
    /// # Returns
    ///
    /// A [`ManifestInfo`]. When the manifest is absent or cannot be parsed,
    /// lists are empty, optional fields are `None` and the name is the
    /// folder's basename.
    #[must_use]
    pub fn read(root: &Path) -> ManifestInfo {
        let mut manifest = match Self::load(root) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                debug!(root = %root.display(), "no {MANIFEST_FILE} found");
                ManifestInfo::default()
            }
            Err(e) => {
                warn!(root = %root.display(), error = %e, "ignoring unreadable manifest");
                ManifestInfo::default()
            }
        };

        if manifest.name.is_empty() {
            manifest.name = fallback_to_directory_name(root);
        }

        manifest
    }

    /// Load and parse the manifest, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the file exists but cannot be read or is
    /// not valid JSON.
    pub fn load(root: &Path) -> Result<Option<ManifestInfo>, ManifestError> {
        let path = root.join(MANIFEST_FILE);

        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| ManifestError::Io {
            path: path.clone(),
            source,
        })?;

        parse_manifest(&content).map(Some)
    }
}

/// Parse the text of a `package.json` file.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] when `content` is not valid JSON.
pub fn parse_manifest(content: &str) -> Result<ManifestInfo, ManifestError> {
    let json = from_str::<Value>(content)?;

    Ok(ManifestInfo {
        name: string_field(&json, "name").unwrap_or_default(),
        description: string_field(&json, "description"),
        license: string_field(&json, "license"),
        repository_url: nested_string_field(&json, "repository", "url"),
        version: string_field(&json, "version"),
        author: nested_string_field(&json, "author", "name"),
        homepage: string_field(&json, "homepage"),
        dependency_names: object_keys(&json, "dependencies"),
        dev_dependency_names: object_keys(&json, "devDependencies"),
        script_names: object_keys(&json, "scripts"),
    })
}

/// Read a non-empty string field.
fn string_field(json: &Value, key: &str) -> Option<String> {
    json.get(key).and_then(non_empty_str)
}

/// Read a field that is either a string or an object holding `inner`.
///
/// Covers `"author": "Jane"` as well as `"author": { "name": "Jane" }`.
fn nested_string_field(json: &Value, key: &str, inner: &str) -> Option<String> {
    match json.get(key)? {
        Value::Object(map) => map.get(inner).and_then(non_empty_str),
        other => non_empty_str(other),
    }
}

/// Keys of an object field, in declaration order.
fn object_keys(json: &Value, key: &str) -> Vec<String> {
    json.get(key)
        .and_then(Value::as_object)
        .map(Map::keys)
        .map(|keys| keys.cloned().collect())
        .unwrap_or_default()
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Use the directory's basename as the project name.
fn fallback_to_directory_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map_or_else(|| FALLBACK_PROJECT_NAME.to_string(), ToString::to_string)
}
