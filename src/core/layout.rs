//! Output path convention.
//!
//! Every artifact path comes from here, so the archive a dependent links
//! is exactly the archive its library unit writes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default build output directory, relative to the invocation directory.
pub const DEFAULT_OUT_DIR: &str = "target/native";

/// Maps `(package, unit)` to artifact locations under a build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OutputLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical artifact path prefix: `<root>/<package>/<name>`.
    pub fn artifact_path(&self, package: &str, name: &str) -> PathBuf {
        self.root.join(package).join(name)
    }

    /// Directory holding the unit's object files: `<artifact>_obj`.
    pub fn object_dir(&self, package: &str, name: &str) -> PathBuf {
        with_suffix(&self.artifact_path(package, name), "_obj")
    }

    /// Static archive of a library unit: `<artifact>.a`.
    pub fn archive_path(&self, package: &str, name: &str) -> PathBuf {
        with_suffix(&self.artifact_path(package, name), ".a")
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        OutputLayout::new(DEFAULT_OUT_DIR)
    }
}

/// Append `suffix` to the final path component verbatim.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}
