//! Toolchain abstraction for native unit commands.
//!
//! Every variant turns a [`NativeDescriptor`] into an ordered list of shell
//! command strings. Platform variants only choose extra compile and link
//! flags and hand the actual assembly to [`UnixToolchain::synthesize`].
//!
//! Variant selection by target OS:
//! 1. `macos` - [`DarwinToolchain`]
//! 2. `linux` - [`LinuxToolchain`]
//! 3. anything else - [`UnixToolchain`] with no extra flags

use std::fmt;
use std::path::Path;

use crate::builder::errors::CommandError;
use crate::core::descriptor::NativeDescriptor;
use crate::util::shell::quote_path;

mod darwin;
mod linux;
mod unix;

pub use darwin::DarwinToolchain;
pub use linux::LinuxToolchain;
pub use unix::UnixToolchain;

/// A shell command line under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program text, possibly with leading flags (e.g. `cc -fPIC`)
    program: String,
    /// Arguments, already quoted where needed
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument verbatim.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple verbatim arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add a double-quoted path argument.
    pub fn path(self, path: &Path) -> Self {
        self.arg(quote_path(path))
    }

    /// Add several double-quoted path arguments.
    pub fn paths<'p>(self, paths: impl IntoIterator<Item = &'p Path>) -> Self {
        paths.into_iter().fold(self, |cmd, p| cmd.path(p))
    }

    /// Add a pre-rendered flag string (e.g. pkg-config output), skipping it if blank.
    pub fn raw(self, flags: &str) -> Self {
        let flags = flags.trim();
        if flags.is_empty() {
            self
        } else {
            self.arg(flags)
        }
    }

    /// Render as a single shell command string.
    pub fn to_shell(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell())
    }
}

/// The platform family of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainPlatform {
    /// Generic Unix, no platform flags
    Unix,
    /// GNU/Linux
    Linux,
    /// macOS with Xcode tools
    Darwin,
}

impl ToolchainPlatform {
    /// Get the platform name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainPlatform::Unix => "unix",
            ToolchainPlatform::Linux => "linux",
            ToolchainPlatform::Darwin => "darwin",
        }
    }
}

/// Trait for toolchain implementations.
pub trait Toolchain {
    /// Get the toolchain platform.
    fn platform(&self) -> ToolchainPlatform;

    /// Commands building `desc`: object directory creation, one compile per
    /// source, then exactly one archive or link command.
    fn commands(&self, desc: &NativeDescriptor) -> Result<Vec<String>, CommandError>;
}

/// The OS this binary was built for, in `std::env::consts::OS` spelling.
pub fn host_os() -> &'static str {
    std::env::consts::OS
}

/// Wrap the generic toolchain in the variant for `os`.
pub fn select_toolchain(os: &str, base: UnixToolchain) -> Box<dyn Toolchain> {
    let toolchain: Box<dyn Toolchain> = match os {
        "macos" => Box::new(DarwinToolchain::new(base)),
        "linux" => Box::new(LinuxToolchain::new(base)),
        _ => Box::new(base),
    };

    tracing::debug!(
        "Selected {} toolchain for `{}`",
        toolchain.platform().as_str(),
        os
    );

    toolchain
}
