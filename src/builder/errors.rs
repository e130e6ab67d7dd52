//! Command synthesis errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while turning a descriptor into commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("pkg-config query for `{}` failed with {}", .names.join(" "), describe_status(.status))]
    PkgConfigQueryFailed {
        names: Vec<String>,
        status: Option<i32>,
        stderr: String,
    },

    #[error("failed to run `{}`", .program.display())]
    PkgConfigSpawn {
        program: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "termination by signal".to_string(),
    }
}

impl CommandError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            CommandError::PkgConfigQueryFailed { stderr, .. } if !stderr.is_empty() => diag
                .with_context(stderr.clone())
                .with_suggestion(suggestions::PKG_CONFIG),
            CommandError::PkgConfigQueryFailed { .. } => {
                diag.with_suggestion(suggestions::PKG_CONFIG)
            }
            CommandError::PkgConfigSpawn { source, .. } => diag.with_context(source.to_string()),
        }
    }
}
