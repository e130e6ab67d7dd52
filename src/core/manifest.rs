//! Berth.toml native manifest parsing.
//!
//! A manifest has one table per unit kind, each mapping unit names to their
//! configuration:
//!
//! ```toml
//! [library.strbuf]
//! sources = ["strbuf.c"]
//! includes = ["include"]
//!
//! [loadable-extension.fast_json]
//! src_dir = "c_src"
//! sources = ["nif.c"]
//! deps = { shared = ["arena", "strbuf"] }
//! ```
//!
//! Unknown tables and keys are rejected. Units and dependency entries keep
//! document order.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::core::unit::{DepRef, RawDeclaration, UnitKind};

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Berth.toml";

/// The parsed native manifest of one package.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Declarations: libraries, then loadable extensions, then standalone nodes
    pub declarations: Vec<RawDeclaration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    library: Ordered<RawUnit>,

    #[serde(default, rename = "loadable-extension")]
    loadable_extension: Ordered<RawUnit>,

    #[serde(default, rename = "standalone-node")]
    standalone_node: Ordered<RawUnit>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUnit {
    #[serde(default)]
    includes: Vec<PathBuf>,

    #[serde(default)]
    libs: Vec<String>,

    #[serde(default)]
    lib_dirs: Vec<PathBuf>,

    #[serde(default)]
    pkg_configs: Vec<String>,

    #[serde(default)]
    sources: Vec<PathBuf>,

    #[serde(default)]
    deps: Ordered<DepNames>,

    /// Overrides the default source directory (the package identifier)
    #[serde(default)]
    src_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DepNames {
    One(String),
    Many(Vec<String>),
}

impl DepNames {
    fn into_vec(self) -> Vec<String> {
        match self {
            DepNames::One(name) => vec![name],
            DepNames::Many(names) => names,
        }
    }
}

/// A `name -> value` table kept in document order.
#[derive(Debug)]
struct Ordered<T>(Vec<(String, T)>);

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Ordered(Vec::new())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Ordered<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    entries.push((key, value));
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let tables = [
            (UnitKind::Library, raw.library),
            (UnitKind::LoadableExtension, raw.loadable_extension),
            (UnitKind::StandaloneNode, raw.standalone_node),
        ];

        let mut seen = HashSet::new();
        let mut declarations = Vec::new();

        for (kind, units) in tables {
            for (name, unit) in units.0 {
                if !seen.insert(name.clone()) {
                    bail!(
                        "native unit `{}` is declared more than once in {}",
                        name,
                        path.display()
                    );
                }
                declarations.push(Self::convert_unit(name, kind, unit)?);
            }
        }

        Ok(Manifest { declarations })
    }

    fn convert_unit(name: String, kind: UnitKind, raw: RawUnit) -> Result<RawDeclaration> {
        let mut deps = Vec::with_capacity(raw.deps.0.len());
        for (package, names) in raw.deps.0 {
            let names = names.into_vec();
            if names.is_empty() {
                bail!(
                    "native unit `{}`: dependency on `{}` names no libraries",
                    name,
                    package
                );
            }
            deps.push(DepRef { package, names });
        }

        Ok(RawDeclaration {
            name,
            kind,
            src_dir: raw.src_dir,
            includes: raw.includes,
            libs: raw.libs,
            lib_dirs: raw.lib_dirs,
            pkg_configs: raw.pkg_configs,
            sources: raw.sources,
            deps,
        })
    }
}
