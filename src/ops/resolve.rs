//! Package resolution operations.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::descriptor::NativeDescriptor;
use crate::core::package::ProjectLoader;
use crate::core::runtime::RuntimeLocator;
use crate::resolver::Resolver;

/// Resolve every native unit of `package`.
///
/// The runtime is located once up front. Any resolution failure is returned
/// as a [`ResolveError`](crate::resolver::ResolveError) inside the
/// `anyhow::Error`, so callers can downcast it for diagnostics.
pub fn resolve_package(
    loader: &dyn ProjectLoader,
    locator: &dyn RuntimeLocator,
    package: &str,
) -> Result<Vec<NativeDescriptor>> {
    let manifest = loader
        .load(package)
        .with_context(|| format!("failed to load package `{}`", package))?;

    let runtime = locator.locate().context("failed to locate the host runtime")?;
    tracing::debug!(
        "Runtime: {} include dirs, {} lib dirs",
        runtime.includes.len(),
        runtime.lib_dirs.len()
    );

    let descriptors = Resolver::new(loader, &runtime).resolve_package(&manifest)?;
    Ok(descriptors)
}

/// Render a descriptor for terminal output.
pub fn format_descriptor(desc: &NativeDescriptor) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", desc.id(), desc.kind));

    let field = |out: &mut String, label: &str, values: Vec<String>| {
        let rendered = if values.is_empty() {
            "-".to_string()
        } else {
            values.join(" ")
        };
        out.push_str(&format!("  {:<12} {}\n", format!("{}:", label), rendered));
    };

    field(&mut out, "sources", paths(&desc.sources));
    field(&mut out, "includes", paths(&desc.includes));
    field(&mut out, "libs", desc.libs.clone());
    field(&mut out, "lib_dirs", paths(&desc.lib_dirs));
    field(&mut out, "pkg_configs", desc.pkg_configs.clone());
    field(
        &mut out,
        "deps",
        desc.deps.iter().map(|d| d.to_string()).collect(),
    );

    out
}

fn paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}
