//! Native unit declarations - what a package manifest asks to build.
//!
//! A [`RawDeclaration`] is the pre-merge form of a unit: its own flags,
//! its own sources and the libraries it wants from other packages.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The kind of native unit being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    /// Static archive, consumed only by other units
    Library,

    /// Shared object loaded in-process by the runtime
    LoadableExtension,

    /// Separate executable talking to the runtime out-of-process
    StandaloneNode,
}

impl UnitKind {
    /// Get the manifest name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Library => "library",
            UnitKind::LoadableExtension => "loadable-extension",
            UnitKind::StandaloneNode => "standalone-node",
        }
    }

    /// Check if this kind produces a static archive.
    pub fn is_library(&self) -> bool {
        matches!(self, UnitKind::Library)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dependency entry: libraries requested from one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepRef {
    /// Package that owns the libraries
    pub package: String,

    /// Library unit names, in declaration order
    pub names: Vec<String>,
}

impl DepRef {
    pub fn new(
        package: impl Into<String>,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        DepRef {
            package: package.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// A native unit as declared in a manifest, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    /// Unit name
    pub name: String,

    /// What kind of artifact to produce
    pub kind: UnitKind,

    /// Source directory under the package source root.
    /// Defaults to the owning package's identifier.
    pub src_dir: Option<PathBuf>,

    /// Include directories, relative to the package source root
    pub includes: Vec<PathBuf>,

    /// Link names (without `-l`)
    pub libs: Vec<String>,

    /// Library search directories
    pub lib_dirs: Vec<PathBuf>,

    /// pkg-config package names
    pub pkg_configs: Vec<String>,

    /// Source filenames, relative to the source directory
    pub sources: Vec<PathBuf>,

    /// Libraries pulled in from this or other packages
    pub deps: Vec<DepRef>,
}

impl RawDeclaration {
    /// Create an empty declaration.
    pub fn new(name: impl Into<String>, kind: UnitKind) -> Self {
        RawDeclaration {
            name: name.into(),
            kind,
            src_dir: None,
            includes: Vec::new(),
            libs: Vec::new(),
            lib_dirs: Vec::new(),
            pkg_configs: Vec::new(),
            sources: Vec::new(),
            deps: Vec::new(),
        }
    }

    pub fn library(name: impl Into<String>) -> Self {
        Self::new(name, UnitKind::Library)
    }

    pub fn extension(name: impl Into<String>) -> Self {
        Self::new(name, UnitKind::LoadableExtension)
    }

    pub fn node(name: impl Into<String>) -> Self {
        Self::new(name, UnitKind::StandaloneNode)
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_includes(mut self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.includes = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_libs(mut self, libs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.libs = libs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_lib_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.lib_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pkg_configs(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.pkg_configs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_src_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.src_dir = Some(dir.into());
        self
    }

    /// Add a dependency entry.
    pub fn with_dep(
        mut self,
        package: impl Into<String>,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.deps.push(DepRef::new(package, names));
        self
    }

    /// The source directory, falling back to the owning package's identifier.
    pub fn source_dir(&self, package: &str) -> PathBuf {
        self.src_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(package))
    }
}
