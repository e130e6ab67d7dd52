//! Resolution error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error during native unit resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("native unit `{0}` has no sources")]
    NoSourcesInNative(String),

    #[error("libraries not found in package `{package}`: {}", .names.join(", "))]
    LibsNotFound { package: String, names: Vec<String> },

    #[error("failed to resolve native dependencies from package `{package}`")]
    DependencyResolutionFailed {
        package: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error("cyclic native dependency: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    #[error("failed to load manifest for package `{package}`")]
    ManifestLoad {
        package: String,
        #[source]
        source: BoxError,
    },
}

impl ResolveError {
    /// Wrap an error raised while resolving libraries of `package`.
    pub fn in_dependency(package: impl Into<String>, err: ResolveError) -> Self {
        ResolveError::DependencyResolutionFailed {
            package: package.into(),
            source: Box::new(err),
        }
    }

    /// The innermost error of a dependency chain.
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            ResolveError::DependencyResolutionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Packages traversed from the failing call down to the root cause.
    pub fn package_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self;
        while let ResolveError::DependencyResolutionFailed { package, source } = current {
            chain.push(package.as_str());
            current = source.as_ref();
        }
        chain
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.root_cause().to_string());

        let chain = self.package_chain();
        if !chain.is_empty() {
            diag = diag.with_context(format!("via dependency chain: {}", chain.join(" -> ")));
        }

        match self.root_cause() {
            ResolveError::NoSourcesInNative(_) => diag.with_suggestion(suggestions::NO_SOURCES),

            ResolveError::LibsNotFound { .. } => diag.with_suggestion(suggestions::LIBS_NOT_FOUND),

            ResolveError::CyclicDependency { .. } => diag.with_suggestion(suggestions::CYCLE),

            ResolveError::ManifestLoad { source, .. } => diag
                .with_context(source.to_string())
                .with_suggestion(suggestions::MANIFEST_LOAD),

            ResolveError::DependencyResolutionFailed { .. } => diag,
        }
    }
}
