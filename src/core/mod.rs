//! Core data structures.
//!
//! This module contains the types resolution and command synthesis share:
//! - Unit declarations and resolved descriptors
//! - Package manifests and the loader seam
//! - Runtime discovery
//! - The output path convention

pub mod descriptor;
pub mod layout;
pub mod manifest;
pub mod package;
pub mod runtime;
pub mod unit;

pub use descriptor::{NativeDescriptor, UnitRef};
pub use layout::OutputLayout;
pub use manifest::{Manifest, MANIFEST_NAME};
pub use package::{MemoryLoader, PackageManifest, ProjectLoader, WorkspaceLoader};
pub use runtime::{ErtsLocator, RuntimeInfo, RuntimeLocator, StaticRuntime};
pub use unit::{DepRef, RawDeclaration, UnitKind};
