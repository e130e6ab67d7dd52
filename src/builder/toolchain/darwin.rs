//! Darwin/Xcode toolchain.

use crate::builder::errors::CommandError;
use crate::core::descriptor::NativeDescriptor;
use crate::core::unit::UnitKind;

use super::{Toolchain, ToolchainPlatform, UnixToolchain};

const EXTENSION_CFLAGS: &[&str] = &["-fPIC"];

/// Leave runtime symbols unresolved; the host process provides them at load time.
const EXTENSION_LDFLAGS: &[&str] = &["-dynamiclib", "-undefined", "dynamic_lookup"];

/// macOS toolchain: builds loadable extensions as dynamic libraries.
#[derive(Debug)]
pub struct DarwinToolchain {
    inner: UnixToolchain,
}

impl DarwinToolchain {
    pub fn new(inner: UnixToolchain) -> Self {
        DarwinToolchain { inner }
    }

    /// Get a reference to the generic toolchain.
    pub fn inner(&self) -> &UnixToolchain {
        &self.inner
    }
}

impl Toolchain for DarwinToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Darwin
    }

    fn commands(&self, desc: &NativeDescriptor) -> Result<Vec<String>, CommandError> {
        let (cflags, ldflags): (&[&str], &[&str]) = match desc.kind {
            UnitKind::LoadableExtension => (EXTENSION_CFLAGS, EXTENSION_LDFLAGS),
            UnitKind::Library | UnitKind::StandaloneNode => (&[], &[]),
        };

        self.inner.synthesize(
            desc,
            &self.inner.compile_program(cflags),
            &self.inner.link_program(ldflags),
        )
    }
}
