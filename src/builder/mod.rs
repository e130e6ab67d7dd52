//! Native command synthesis.
//!
//! This module turns resolved descriptors into compile, archive and link
//! command strings for the toolchain of the target platform.

pub mod errors;
pub mod pkg_config;
pub mod profile;
pub mod toolchain;

pub use errors::CommandError;
pub use pkg_config::{PkgConfig, PkgConfigCli};
pub use profile::BuildProfile;
pub use toolchain::{
    host_os, select_toolchain, CommandSpec, DarwinToolchain, LinuxToolchain, Toolchain,
    ToolchainPlatform, UnixToolchain,
};
