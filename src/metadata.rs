//! The immutable project snapshot every later stage reads from.

use std::{collections::BTreeSet, path::PathBuf};

use tracing::debug;

use crate::{
    classifier::Category,
    manifest::{DependencyReader, ManifestInfo, PackageManager},
    scanner::{ScanSummary, Scanner},
};

/// Everything known about a project, gathered once per invocation.
///
/// Built by [`ProjectMetadata::collect`] (or [`ProjectMetadata::from_parts`]
/// in tests) and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// Project name from the manifest or the folder; never empty
    pub name: String,

    pub description: Option<String>,
    pub license: Option<String>,
    pub repository_url: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub homepage: Option<String>,

    /// Runtime dependency names, in declaration order
    pub dependency_names: Vec<String>,

    /// Development dependency names, in declaration order
    pub dev_dependency_names: Vec<String>,

    /// Script names, in declaration order
    pub script_names: Vec<String>,

    /// Distinct file extensions observed near the root
    pub file_extensions: BTreeSet<String>,

    /// Whether test files or directories were found
    pub has_tests: bool,

    /// Whether a file or directory name near the root mentions `controller`
    pub has_controller_signal: bool,

    /// Package manager inferred from lockfiles
    pub package_manager: PackageManager,

    /// Absolute project root; used for tree rendering only
    pub root_path: PathBuf,

    /// Category label computed from all other fields; never empty
    pub detected_framework: String,
}

impl ProjectMetadata {
    /// Scan `root` and read its manifest to build the snapshot.
    ///
    /// Relative roots are made absolute when possible. Neither the scan nor
    /// the manifest read can fail; both fall back to defaults.
    #[must_use]
    pub fn collect(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root_path = std::path::absolute(&root).unwrap_or(root);

        let manifest = DependencyReader::read(&root_path);
        let scan = Scanner::default().scan(&root_path);
        let package_manager = PackageManager::detect(&root_path);

        let metadata = Self::from_parts(root_path, manifest, scan, package_manager);

        debug!(
            name = %metadata.name,
            framework = %metadata.detected_framework,
            dependencies = metadata.dependency_names.len(),
            extensions = metadata.file_extensions.len(),
            "collected project metadata"
        );

        metadata
    }

    /// Assemble a snapshot from already gathered parts.
    ///
    /// `detected_framework` is derived here, after every other field is set.
    #[must_use]
    pub fn from_parts(
        root_path: PathBuf,
        manifest: ManifestInfo,
        scan: ScanSummary,
        package_manager: PackageManager,
    ) -> Self {
        let mut metadata = Self {
            name: manifest.name,
            description: manifest.description,
            license: manifest.license,
            repository_url: manifest.repository_url,
            version: manifest.version,
            author: manifest.author,
            homepage: manifest.homepage,
            dependency_names: manifest.dependency_names,
            dev_dependency_names: manifest.dev_dependency_names,
            script_names: manifest.script_names,
            file_extensions: scan.file_extensions,
            has_tests: scan.has_tests,
            has_controller_signal: scan.has_controller_signal,
            package_manager,
            root_path,
            detected_framework: String::new(),
        };

        metadata.detected_framework = Category::detect(&metadata).label().to_string();
        metadata
    }

    /// Whether the manifest declares any dependency at all.
    #[must_use]
    pub fn has_dependencies(&self) -> bool {
        !self.dependency_names.is_empty() || !self.dev_dependency_names.is_empty()
    }

    /// Runtime and development dependency names, in that order.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependency_names
            .iter()
            .chain(&self.dev_dependency_names)
            .map(String::as_str)
    }

    /// Whether a script with exactly this name is declared.
    #[must_use]
    pub fn has_script(&self, name: &str) -> bool {
        self.script_names.iter().any(|s| s == name)
    }
}
