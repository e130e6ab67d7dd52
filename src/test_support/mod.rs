//! Test fixtures and fakes shared by unit tests.
//!
//! Provides a fixed runtime info, a small dependency package, and
//! a [`FakePkgConfig`] that answers queries from a table instead of
//! spawning `pkg-config`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::builder::errors::CommandError;
use crate::builder::pkg_config::PkgConfig;
use crate::core::package::PackageManifest;
use crate::core::runtime::RuntimeInfo;
use crate::core::unit::RawDeclaration;

/// Runtime with one include and one library directory.
pub fn runtime() -> RuntimeInfo {
    RuntimeInfo::new(
        vec![PathBuf::from("/erts/include")],
        vec![PathBuf::from("/erts/lib")],
    )
}

/// A package `shared` rooted at `/src/shared`:
/// - `strbuf`: library with includes, libs, lib_dirs and a pkg-config name
/// - `arena`: library depending on `strbuf`
/// - `shared_nif`: a loadable extension, not usable as a dependency
pub fn shared_package() -> PackageManifest {
    PackageManifest::new("shared", "/src/shared")
        .with(
            RawDeclaration::library("strbuf")
                .with_sources(["strbuf.c"])
                .with_includes(["include"])
                .with_libs(["z"])
                .with_lib_dirs(["/opt/z/lib"])
                .with_pkg_configs(["zlib"]),
        )
        .with(
            RawDeclaration::library("arena")
                .with_sources(["arena.c"])
                .with_dep("shared", ["strbuf"]),
        )
        .with(RawDeclaration::extension("shared_nif").with_sources(["n.c"]))
}

/// pkg-config stand-in answering from fixed tables.
#[derive(Debug, Clone, Default)]
pub struct FakePkgConfig {
    cflags: HashMap<String, String>,
    libs: HashMap<String, String>,
}

impl FakePkgConfig {
    pub fn new() -> Self {
        FakePkgConfig::default()
    }

    /// Register a package with its `--cflags` and `--libs` answers.
    pub fn with(mut self, name: &str, cflags: &str, libs: &str) -> Self {
        self.cflags.insert(name.to_string(), cflags.to_string());
        self.libs.insert(name.to_string(), libs.to_string());
        self
    }

    fn answer(
        table: &HashMap<String, String>,
        names: &[String],
    ) -> Result<String, CommandError> {
        let mut parts = Vec::new();
        for name in names {
            match table.get(name) {
                Some(flags) => parts.push(flags.clone()),
                None => {
                    return Err(CommandError::PkgConfigQueryFailed {
                        names: names.to_vec(),
                        status: Some(1),
                        stderr: format!("Package {} was not found", name),
                    })
                }
            }
        }
        Ok(parts.join(" "))
    }
}

impl PkgConfig for FakePkgConfig {
    fn cflags(&self, names: &[String]) -> Result<String, CommandError> {
        Self::answer(&self.cflags, names)
    }

    fn libs(&self, names: &[String]) -> Result<String, CommandError> {
        Self::answer(&self.libs, names)
    }
}
