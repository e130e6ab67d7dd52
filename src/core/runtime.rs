//! Host runtime probing.
//!
//! Native units compile against the runtime's headers, and standalone
//! nodes link against its interface library. The runtime info is read-only
//! input to resolution.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::process::ProcessBuilder;

/// Include and library directories provided by the host runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    #[serde(default)]
    pub includes: Vec<PathBuf>,

    #[serde(default)]
    pub lib_dirs: Vec<PathBuf>,
}

impl RuntimeInfo {
    pub fn new(includes: Vec<PathBuf>, lib_dirs: Vec<PathBuf>) -> Self {
        RuntimeInfo { includes, lib_dirs }
    }
}

/// Source of [`RuntimeInfo`].
pub trait RuntimeLocator {
    fn locate(&self) -> Result<RuntimeInfo>;
}

/// A locator that returns fixed, configured values.
#[derive(Debug, Clone, Default)]
pub struct StaticRuntime(pub RuntimeInfo);

impl RuntimeLocator for StaticRuntime {
    fn locate(&self) -> Result<RuntimeInfo> {
        Ok(self.0.clone())
    }
}

/// Expression printing the runtime root and the interface library directory.
const ERTS_QUERY: &str =
    "io:format(\"~s~n~s~n\", [code:root_dir(), code:lib_dir(erl_interface)]), halt().";

/// Locates an installed runtime by asking it for its own directories.
#[derive(Debug, Clone)]
pub struct ErtsLocator {
    erl: PathBuf,
}

impl ErtsLocator {
    pub fn new(erl: impl Into<PathBuf>) -> Self {
        ErtsLocator { erl: erl.into() }
    }

    /// Locate `erl` on PATH.
    pub fn detect() -> Option<Self> {
        which::which("erl").ok().map(Self::new)
    }
}

impl RuntimeLocator for ErtsLocator {
    fn locate(&self) -> Result<RuntimeInfo> {
        let output = ProcessBuilder::new(&self.erl)
            .args(["-noshell", "-eval", ERTS_QUERY])
            .exec_and_check()
            .with_context(|| format!("failed to query runtime via {}", self.erl.display()))?;

        parse_erts_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Turn the two-line query answer into include and library directories.
pub fn parse_erts_output(stdout: &str) -> Result<RuntimeInfo> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());

    let (Some(root), Some(ei_dir)) = (lines.next(), lines.next()) else {
        bail!("unexpected runtime query output: {:?}", stdout);
    };

    let root = Path::new(root);
    let ei_dir = Path::new(ei_dir);

    Ok(RuntimeInfo {
        includes: vec![root.join("usr").join("include"), ei_dir.join("include")],
        lib_dirs: vec![root.join("usr").join("lib"), ei_dir.join("lib")],
    })
}
