//! Packages and the project loader seam.
//!
//! Resolution never reads the filesystem directly; it asks a
//! [`ProjectLoader`] for the manifest of each package it needs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::manifest::{Manifest, MANIFEST_NAME};
use crate::core::unit::RawDeclaration;

/// One package's source root and native declarations.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    /// Package identifier
    pub id: String,

    /// Root directory that source and include paths are relative to
    pub source_root: PathBuf,

    /// Declared native units, in declaration order
    pub declarations: Vec<RawDeclaration>,
}

impl PackageManifest {
    pub fn new(id: impl Into<String>, source_root: impl Into<PathBuf>) -> Self {
        PackageManifest {
            id: id.into(),
            source_root: source_root.into(),
            declarations: Vec::new(),
        }
    }

    /// Add a declaration.
    pub fn with(mut self, decl: RawDeclaration) -> Self {
        self.declarations.push(decl);
        self
    }

    /// Declarations of `library` kind.
    pub fn libraries(&self) -> impl Iterator<Item = &RawDeclaration> {
        self.declarations.iter().filter(|d| d.kind.is_library())
    }
}

/// Loads a package's manifest by identifier.
pub trait ProjectLoader {
    fn load(&self, package: &str) -> Result<PackageManifest>;
}

/// Loads packages laid out as `<root>/<package>/Berth.toml`.
#[derive(Debug, Clone)]
pub struct WorkspaceLoader {
    root: PathBuf,
}

impl WorkspaceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        WorkspaceLoader { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a package in this workspace.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.root.join(package)
    }
}

impl ProjectLoader for WorkspaceLoader {
    fn load(&self, package: &str) -> Result<PackageManifest> {
        let dir = self.package_dir(package);
        let manifest_path = dir.join(MANIFEST_NAME);

        if !manifest_path.exists() {
            bail!(
                "could not find {} for package `{}` in {}",
                MANIFEST_NAME,
                package,
                dir.display()
            );
        }

        tracing::debug!("Loading native manifest {}", manifest_path.display());
        let manifest = Manifest::load(&manifest_path)?;

        Ok(PackageManifest {
            id: package.to_string(),
            source_root: dir,
            declarations: manifest.declarations,
        })
    }
}

/// In-memory package set.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    packages: HashMap<String, PackageManifest>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        MemoryLoader::default()
    }

    /// Register a package, replacing any previous one with the same id.
    pub fn insert(&mut self, package: PackageManifest) {
        self.packages.insert(package.id.clone(), package);
    }

    pub fn with(mut self, package: PackageManifest) -> Self {
        self.insert(package);
        self
    }
}

impl ProjectLoader for MemoryLoader {
    fn load(&self, package: &str) -> Result<PackageManifest> {
        match self.packages.get(package) {
            Some(manifest) => Ok(manifest.clone()),
            None => bail!("unknown package `{}`", package),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit::UnitKind;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_loader() {
        let tmp = TempDir::new().unwrap();
        let pkg_dir = tmp.path().join("shared");
        std::fs::create_dir_all(&pkg_dir).unwrap();
        std::fs::write(
            pkg_dir.join(MANIFEST_NAME),
            r#"
[library.strbuf]
sources = ["strbuf.c"]
"#,
        )
        .unwrap();

        let loader = WorkspaceLoader::new(tmp.path());
        let pkg = loader.load("shared").unwrap();

        assert_eq!(pkg.id, "shared");
        assert_eq!(pkg.source_root, pkg_dir);
        assert_eq!(pkg.declarations.len(), 1);
        assert_eq!(pkg.declarations[0].kind, UnitKind::Library);
    }

    #[test]
    fn test_workspace_loader_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        let loader = WorkspaceLoader::new(tmp.path());

        let err = loader.load("ghost").unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with(
            PackageManifest::new("shared", "/src/shared")
                .with(RawDeclaration::library("strbuf").with_sources(["strbuf.c"]))
                .with(RawDeclaration::extension("nif").with_sources(["nif.c"])),
        );

        let pkg = loader.load("shared").unwrap();
        let libs: Vec<_> = pkg.libraries().map(|d| d.name.as_str()).collect();
        assert_eq!(libs, vec!["strbuf"]);

        assert!(loader.load("other").is_err());
    }
}
