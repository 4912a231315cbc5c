//! File type scanning for project classification.
//!
//! This module walks the top levels of a project directory to gather the
//! signals the classifier needs from the filesystem itself: which file
//! extensions are present, whether the project appears to contain tests and
//! whether it is laid out around controllers.
//! The walk is deliberately shallow and never fails; filesystem errors end the
//! walk early and whatever was gathered so far is returned.

use std::{collections::BTreeSet, path::Path};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Default number of levels below the root that are visited.
pub const DEFAULT_SCAN_DEPTH: usize = 2;

/// Result of scanning a project directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Distinct file extensions, including the leading dot (e.g. `.ts`)
    pub file_extensions: BTreeSet<String>,

    /// Whether a test-like file or directory was found
    pub has_tests: bool,

    /// Whether a file or directory name mentions `controller`
    pub has_controller_signal: bool,
}

/// Shallow directory scanner collecting file extensions and test markers.
///
/// The scanner looks at the root's children (depth 1) and grandchildren
/// (depth 2). Hidden entries and `node_modules` directories are pruned and
/// never descended into.
#[derive(Clone, Debug)]
pub struct Scanner {
    /// Maximum depth below the root to visit
    max_depth: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_DEPTH)
    }
}

impl Scanner {
    /// Create a scanner that visits at most `max_depth` levels below the root.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Scan a project root for file extensions and test markers.
    ///
    /// # Arguments
    ///
    /// * `root` - The project root directory
    ///
    /// # Returns
    ///
    /// A [`ScanSummary`] with the extensions found and the test and
    /// controller detection results. Each is computed by its own walk, so an
    /// error in one does not affect the others.
    #[must_use]
    pub fn scan(&self, root: &Path) -> ScanSummary {
        ScanSummary {
            file_extensions: self.collect_extensions(root),
            has_tests: self.detect_tests(root),
            has_controller_signal: self.detect_controllers(root),
        }
    }

    /// Collect the distinct extensions of all regular files within reach.
    ///
    /// On a filesystem error the walk stops and the extensions accumulated so
    /// far are returned.
    #[must_use]
    pub fn collect_extensions(&self, root: &Path) -> BTreeSet<String> {
        let mut extensions = BTreeSet::new();

        for entry in self.walker(root) {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file()
                        && let Some(ext) = entry.file_name().to_str().and_then(extension_of)
                    {
                        extensions.insert(ext.to_string());
                    }
                }
                Err(e) => {
                    debug!(root = %root.display(), error = %e, "extension scan stopped early");
                    break;
                }
            }
        }

        extensions
    }

    /// Check whether the project contains test-like files or directories.
    ///
    /// Returns on the first match. A filesystem error ends the search with
    /// `false`.
    #[must_use]
    pub fn detect_tests(&self, root: &Path) -> bool {
        self.find_entry(root, "test", |entry| {
            is_test_name(&entry.file_name().to_string_lossy(), entry.file_type().is_dir())
        })
    }

    /// Check whether any file or directory name mentions `controller`, as in
    /// `controllers/` or `user.controller.ts`.
    ///
    /// Same early exit and error handling as [`Scanner::detect_tests`].
    #[must_use]
    pub fn detect_controllers(&self, root: &Path) -> bool {
        self.find_entry(root, "controller", |entry| {
            is_controller_name(&entry.file_name().to_string_lossy())
        })
    }

    /// Walk until `matches` accepts an entry. Errors end the walk with `false`.
    fn find_entry(
        &self,
        root: &Path,
        marker: &str,
        matches: impl Fn(&DirEntry) -> bool,
    ) -> bool {
        for entry in self.walker(root) {
            match entry {
                Ok(entry) => {
                    if matches(&entry) {
                        debug!(path = %entry.path().display(), marker, "marker found");
                        return true;
                    }
                }
                Err(e) => {
                    debug!(
                        root = %root.display(),
                        marker,
                        error = %e,
                        "marker search stopped early"
                    );
                    return false;
                }
            }
        }

        false
    }

    /// Build the bounded, pruned walk shared by both scans.
    fn walker(&self, root: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(self.max_depth)
            .into_iter()
            .filter_entry(should_visit_entry)
    }
}

/// Decide whether an entry is visited (and, for directories, descended into).
///
/// The root is always visited, even when its own name starts with a dot.
fn should_visit_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }

    let name = entry.file_name().to_string_lossy();

    if name.starts_with('.') {
        return false;
    }

    !(entry.file_type().is_dir() && name == "node_modules")
}

/// Return the extension of a file name, including the leading dot.
///
/// The extension is the text after the last `.`; names without a dot or
/// ending in a dot have none.
fn extension_of(name: &str) -> Option<&str> {
    let idx = name.rfind('.')?;

    if idx + 1 == name.len() {
        return None;
    }

    Some(&name[idx..])
}

fn is_controller_name(name: &str) -> bool {
    name.to_lowercase().contains("controller")
}

/// Check whether a file or directory name looks like a test.
fn is_test_name(name: &str, is_dir: bool) -> bool {
    let lower = name.to_lowercase();

    if lower.contains("test") || lower.contains("spec") {
        return true;
    }

    if is_dir {
        name == "__tests__"
    } else {
        lower.contains(".test.") || lower.contains(".spec.")
    }
}
