//! Berth - native unit planning for runtime extension projects
//!
//! This crate resolves the native units a package declares (static
//! libraries, loadable extensions and standalone nodes) together with the
//! libraries they pull in from sibling packages, and turns each resolved
//! unit into the shell commands that build it.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test fixtures and fakes for Berth unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a fixed runtime info, a sample
/// dependency package, and a table-driven pkg-config.
#[cfg(test)]
pub mod test_support;

pub use builder::{select_toolchain, CommandError, Toolchain, UnixToolchain};
pub use core::{
    descriptor::NativeDescriptor, manifest::Manifest, package::PackageManifest,
    unit::RawDeclaration, unit::UnitKind,
};
pub use resolver::{ResolveError, Resolver};
pub use util::context::GlobalContext;
