//! Resolved native unit descriptors.
//!
//! A [`NativeDescriptor`] is the closed form of a unit: its own flags plus
//! everything folded in from the runtime and its library dependencies.
//! Descriptors are built once per resolution and never mutated afterwards.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::runtime::RuntimeInfo;
use crate::core::unit::UnitKind;

/// Link name of the runtime interface library every standalone node needs.
pub const EI_LIB: &str = "ei";

/// A `(package, unit)` pair identifying one native unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnitRef {
    pub package: String,
    pub name: String,
}

impl UnitRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        UnitRef {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.name)
    }
}

/// The fully merged representation of one build unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeDescriptor {
    pub name: String,
    pub package: String,
    pub kind: UnitKind,
    pub includes: Vec<PathBuf>,
    pub libs: Vec<String>,
    pub lib_dirs: Vec<PathBuf>,
    pub pkg_configs: Vec<String>,
    /// Absolute source paths
    pub sources: Vec<PathBuf>,
    /// Library units whose archives this unit links, dependents first
    pub deps: Vec<UnitRef>,
}

impl NativeDescriptor {
    /// Create a descriptor with no flags.
    pub fn new(package: impl Into<String>, name: impl Into<String>, kind: UnitKind) -> Self {
        NativeDescriptor {
            name: name.into(),
            package: package.into(),
            kind,
            includes: Vec::new(),
            libs: Vec::new(),
            lib_dirs: Vec::new(),
            pkg_configs: Vec::new(),
            sources: Vec::new(),
            deps: Vec::new(),
        }
    }

    /// The `(package, name)` pair of this unit.
    pub fn id(&self) -> UnitRef {
        UnitRef::new(&self.package, &self.name)
    }

    /// Fold a resolved library into this descriptor.
    ///
    /// Flag fields gain the library's values not already present; the
    /// library itself and then its own deps are appended to `deps`.
    pub fn absorb(&mut self, lib: &NativeDescriptor) {
        union_into(&mut self.includes, &lib.includes);
        union_into(&mut self.libs, &lib.libs);
        union_into(&mut self.lib_dirs, &lib.lib_dirs);
        union_into(&mut self.pkg_configs, &lib.pkg_configs);
        union_into(&mut self.deps, &[lib.id()]);
        union_into(&mut self.deps, &lib.deps);
    }

    /// Apply runtime flags and final dedup.
    ///
    /// Runtime values go in front so they shadow unit and dependency paths.
    pub(crate) fn finish(&mut self, runtime: &RuntimeInfo) {
        match self.kind {
            UnitKind::StandaloneNode => {
                prepend(&mut self.libs, &[EI_LIB.to_string()]);
                prepend(&mut self.lib_dirs, &runtime.lib_dirs);
            }
            UnitKind::Library | UnitKind::LoadableExtension => {}
        }
        prepend(&mut self.includes, &runtime.includes);

        dedup_stable(&mut self.sources);
        dedup_stable(&mut self.deps);
    }
}

/// Append every item of `src` not already in `dst`.
fn union_into<T: PartialEq + Clone>(dst: &mut Vec<T>, src: &[T]) {
    for item in src {
        if !dst.contains(item) {
            dst.push(item.clone());
        }
    }
}

/// Put `front` ahead of `dst`, keeping the first occurrence of each item.
fn prepend<T: Eq + Hash + Clone>(dst: &mut Vec<T>, front: &[T]) {
    let mut merged = front.to_vec();
    merged.append(dst);
    dedup_stable(&mut merged);
    *dst = merged;
}

/// Remove duplicates, keeping the first occurrence.
fn dedup_stable<T: Eq + Hash + Clone>(items: &mut Vec<T>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}
