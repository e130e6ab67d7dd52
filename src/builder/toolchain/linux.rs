//! GNU/Linux toolchain.

use crate::builder::errors::CommandError;
use crate::core::descriptor::NativeDescriptor;
use crate::core::unit::UnitKind;

use super::{Toolchain, ToolchainPlatform, UnixToolchain};

const PIC_CFLAGS: &[&str] = &["-fPIC"];
const EXTENSION_LDFLAGS: &[&str] = &["-shared"];

/// Linux toolchain: position-independent code for anything that can end
/// up inside a shared object.
#[derive(Debug)]
pub struct LinuxToolchain {
    inner: UnixToolchain,
}

impl LinuxToolchain {
    pub fn new(inner: UnixToolchain) -> Self {
        LinuxToolchain { inner }
    }
}

impl Toolchain for LinuxToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Linux
    }

    fn commands(&self, desc: &NativeDescriptor) -> Result<Vec<String>, CommandError> {
        // Library archives may be linked into an extension, so they need PIC too.
        let (cflags, ldflags): (&[&str], &[&str]) = match desc.kind {
            UnitKind::LoadableExtension => (PIC_CFLAGS, EXTENSION_LDFLAGS),
            UnitKind::Library => (PIC_CFLAGS, &[]),
            UnitKind::StandaloneNode => (&[], &[]),
        };

        self.inner.synthesize(
            desc,
            &self.inner.compile_program(cflags),
            &self.inner.link_program(ldflags),
        )
    }
}
