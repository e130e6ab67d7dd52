//! pkg-config queries.
//!
//! Compile and link flags for `pkg_configs` names come from the external
//! `pkg-config` tool. Queries block until the tool exits; a non-zero exit
//! is reported as [`CommandError::PkgConfigQueryFailed`].

use std::fmt;
use std::path::PathBuf;

use crate::builder::errors::CommandError;
use crate::util::process::{find_executable, ProcessBuilder};

/// Source of compile and link flags for pkg-config package names.
///
/// An empty name list always yields an empty string.
pub trait PkgConfig: fmt::Debug {
    fn cflags(&self, names: &[String]) -> Result<String, CommandError>;
    fn libs(&self, names: &[String]) -> Result<String, CommandError>;
}

/// Runs the `pkg-config` executable.
#[derive(Debug, Clone)]
pub struct PkgConfigCli {
    program: PathBuf,
}

impl PkgConfigCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        PkgConfigCli {
            program: program.into(),
        }
    }

    /// Locate `preferred` (or `pkgconf`) on PATH, falling back to the bare name.
    pub fn detect(preferred: &str) -> Self {
        [preferred, "pkgconf"]
            .into_iter()
            .find_map(find_executable)
            .map(Self::new)
            .unwrap_or_else(|| Self::new(preferred))
    }

    fn query(&self, flag: &str, names: &[String]) -> Result<String, CommandError> {
        if names.is_empty() {
            return Ok(String::new());
        }

        tracing::debug!("pkg-config {} {}", flag, names.join(" "));

        let output = ProcessBuilder::new(&self.program)
            .arg(flag)
            .args(names)
            .exec()
            .map_err(|e| CommandError::PkgConfigSpawn {
                program: self.program.clone(),
                source: e.into(),
            })?;

        if !output.status.success() {
            return Err(CommandError::PkgConfigQueryFailed {
                names: names.to_vec(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl PkgConfig for PkgConfigCli {
    fn cflags(&self, names: &[String]) -> Result<String, CommandError> {
        self.query("--cflags", names)
    }

    fn libs(&self, names: &[String]) -> Result<String, CommandError> {
        self.query("--libs", names)
    }
}
