//! Native unit resolution.
//!
//! Turns a package's raw declarations into closed [`NativeDescriptor`]s,
//! pulling in requested libraries from the same or other packages and
//! resolving those through the same procedure. Resolution is fail-fast:
//! the first error aborts the whole package and no descriptors are returned.

pub mod errors;

pub use errors::ResolveError;

use crate::core::descriptor::{NativeDescriptor, UnitRef};
use crate::core::package::{PackageManifest, ProjectLoader};
use crate::core::runtime::RuntimeInfo;
use crate::core::unit::{DepRef, RawDeclaration};

/// Resolves native declarations against a loader and runtime info.
pub struct Resolver<'a> {
    loader: &'a dyn ProjectLoader,
    runtime: &'a RuntimeInfo,
}

impl<'a> Resolver<'a> {
    pub fn new(loader: &'a dyn ProjectLoader, runtime: &'a RuntimeInfo) -> Self {
        Resolver { loader, runtime }
    }

    /// Resolve every declaration of `package`, in declaration order.
    pub fn resolve_package(
        &self,
        package: &PackageManifest,
    ) -> Result<Vec<NativeDescriptor>, ResolveError> {
        tracing::info!(
            "Resolving {} native units in `{}`",
            package.declarations.len(),
            package.id
        );

        let mut resolving = Vec::new();
        package
            .declarations
            .iter()
            .map(|decl| self.resolve_unit(package, decl, &mut resolving))
            .collect()
    }

    fn resolve_unit(
        &self,
        package: &PackageManifest,
        decl: &RawDeclaration,
        resolving: &mut Vec<UnitRef>,
    ) -> Result<NativeDescriptor, ResolveError> {
        let id = UnitRef::new(&package.id, &decl.name);

        if let Some(start) = resolving.iter().position(|u| *u == id) {
            let mut chain: Vec<String> = resolving[start..].iter().map(|u| u.to_string()).collect();
            chain.push(id.to_string());
            return Err(ResolveError::CyclicDependency { chain });
        }

        resolving.push(id);
        let result = self.resolve_unit_inner(package, decl, resolving);
        resolving.pop();
        result
    }

    fn resolve_unit_inner(
        &self,
        package: &PackageManifest,
        decl: &RawDeclaration,
        resolving: &mut Vec<UnitRef>,
    ) -> Result<NativeDescriptor, ResolveError> {
        let mut desc = base_descriptor(package, decl)?;

        for dep in &decl.deps {
            for lib in self.resolve_dep(package, dep, resolving)? {
                tracing::debug!("Folding {} into {}", lib.id(), desc.id());
                desc.absorb(&lib);
            }
        }

        desc.finish(self.runtime);

        tracing::debug!(
            "Resolved {} ({}, {} sources, {} deps)",
            desc.id(),
            desc.kind,
            desc.sources.len(),
            desc.deps.len()
        );

        Ok(desc)
    }

    /// Resolve the libraries named by one dependency entry.
    fn resolve_dep(
        &self,
        package: &PackageManifest,
        dep: &DepRef,
        resolving: &mut Vec<UnitRef>,
    ) -> Result<Vec<NativeDescriptor>, ResolveError> {
        let loaded;
        let target = if dep.package == package.id {
            package
        } else {
            loaded = self
                .loader
                .load(&dep.package)
                .map_err(|e| ResolveError::ManifestLoad {
                    package: dep.package.clone(),
                    source: e.into(),
                })?;
            &loaded
        };

        select_libraries(target, &dep.names)?
            .into_iter()
            .map(|lib| {
                self.resolve_unit(target, lib, resolving)
                    .map_err(|e| ResolveError::in_dependency(&dep.package, e))
            })
            .collect()
    }
}

/// Build the unmerged descriptor: absolute sources, anchored includes.
fn base_descriptor(
    package: &PackageManifest,
    decl: &RawDeclaration,
) -> Result<NativeDescriptor, ResolveError> {
    let src_dir = package.source_root.join(decl.source_dir(&package.id));
    let sources: Vec<_> = decl.sources.iter().map(|s| src_dir.join(s)).collect();

    if sources.is_empty() {
        return Err(ResolveError::NoSourcesInNative(decl.name.clone()));
    }

    let mut desc = NativeDescriptor::new(&package.id, &decl.name, decl.kind);
    desc.includes.push(package.source_root.clone());
    desc.includes
        .extend(decl.includes.iter().map(|i| package.source_root.join(i)));
    desc.libs = decl.libs.clone();
    desc.lib_dirs = decl.lib_dirs.clone();
    desc.pkg_configs = decl.pkg_configs.clone();
    desc.sources = sources;

    Ok(desc)
}

/// Pick the requested library declarations, in requested order.
fn select_libraries<'p>(
    package: &'p PackageManifest,
    names: &[String],
) -> Result<Vec<&'p RawDeclaration>, ResolveError> {
    let mut found = Vec::with_capacity(names.len());
    let mut missing = Vec::new();

    for name in names {
        match package.libraries().find(|d| &d.name == name) {
            Some(decl) => found.push(decl),
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(ResolveError::LibsNotFound {
            package: package.id.clone(),
            names: missing,
        });
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::package::MemoryLoader;
    use crate::core::unit::UnitKind;
    use crate::test_support::{runtime, shared_package};

    fn resolve(
        loader: &MemoryLoader,
        package: &PackageManifest,
    ) -> Result<Vec<NativeDescriptor>, ResolveError> {
        let rt = runtime();
        Resolver::new(loader, &rt).resolve_package(package)
    }

    #[test]
    fn test_one_descriptor_per_unit_without_deps() {
        let pkg = PackageManifest::new("app", "/src/app")
            .with(RawDeclaration::library("util").with_sources(["util.c"]))
            .with(
                RawDeclaration::extension("nif")
                    .with_sources(["nif.c"])
                    .with_includes(["include"]),
            )
            .with(RawDeclaration::node("port").with_sources(["port.c"]));

        let descs = resolve(&MemoryLoader::new(), &pkg).unwrap();

        assert_eq!(descs.len(), 3);
        let kinds: Vec<_> = descs.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                UnitKind::Library,
                UnitKind::LoadableExtension,
                UnitKind::StandaloneNode
            ]
        );

        let nif = &descs[1];
        assert_eq!(
            nif.includes,
            vec![
                PathBuf::from("/erts/include"),
                PathBuf::from("/src/app"),
                PathBuf::from("/src/app/include"),
            ]
        );
        assert_eq!(nif.sources, vec![PathBuf::from("/src/app/app/nif.c")]);
    }

    #[test]
    fn test_src_dir_override() {
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_src_dir("c_src")
                .with_sources(["nif.c"]),
        );

        let descs = resolve(&MemoryLoader::new(), &pkg).unwrap();
        assert_eq!(descs[0].sources, vec![PathBuf::from("/src/app/c_src/nif.c")]);
    }

    #[test]
    fn test_node_gets_runtime_link_flags() {
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::node("port")
                .with_sources(["port.c"])
                .with_libs(["pthread"]),
        );

        let descs = resolve(&MemoryLoader::new(), &pkg).unwrap();
        assert_eq!(descs[0].libs, vec!["ei", "pthread"]);
        assert_eq!(descs[0].lib_dirs, vec![PathBuf::from("/erts/lib")]);
    }

    #[test]
    fn test_empty_sources_fail() {
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_includes(["include"])
                .with_libs(["m"]),
        );

        let err = resolve(&MemoryLoader::new(), &pkg).unwrap_err();
        assert!(matches!(err, ResolveError::NoSourcesInNative(ref n) if n == "nif"));
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let pkg = PackageManifest::new("app", "/src/app")
            .with(RawDeclaration::extension("good").with_sources(["good.c"]))
            .with(RawDeclaration::extension("bad"));

        assert!(resolve(&MemoryLoader::new(), &pkg).is_err());
    }

    #[test]
    fn test_merges_foreign_library() {
        let loader = MemoryLoader::new().with(shared_package());
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_libs(["m"])
                .with_dep("shared", ["strbuf"]),
        );

        let nif = resolve(&loader, &pkg).unwrap().remove(0);

        assert_eq!(nif.libs, vec!["m", "z"]);
        assert_eq!(nif.pkg_configs, vec!["zlib"]);
        assert_eq!(nif.lib_dirs, vec![PathBuf::from("/opt/z/lib")]);
        assert_eq!(
            nif.includes,
            vec![
                PathBuf::from("/erts/include"),
                PathBuf::from("/src/app"),
                PathBuf::from("/src/shared"),
                PathBuf::from("/src/shared/include"),
            ]
        );
        assert_eq!(nif.deps, vec![UnitRef::new("shared", "strbuf")]);
        // Library sources are compiled into the library's own archive.
        assert_eq!(nif.sources, vec![PathBuf::from("/src/app/app/nif.c")]);
    }

    #[test]
    fn test_transitive_library_deps() {
        let loader = MemoryLoader::new().with(shared_package());
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_dep("shared", ["arena"]),
        );

        let nif = resolve(&loader, &pkg).unwrap().remove(0);

        assert_eq!(
            nif.deps,
            vec![
                UnitRef::new("shared", "arena"),
                UnitRef::new("shared", "strbuf")
            ]
        );
        assert!(nif.libs.contains(&"z".to_string()));
    }

    #[test]
    fn test_same_package_dependency() {
        let pkg = PackageManifest::new("app", "/src/app")
            .with(
                RawDeclaration::library("util")
                    .with_sources(["util.c"])
                    .with_libs(["rt"]),
            )
            .with(
                RawDeclaration::extension("nif")
                    .with_sources(["nif.c"])
                    .with_dep("app", ["util"]),
            );

        let descs = resolve(&MemoryLoader::new(), &pkg).unwrap();
        assert_eq!(descs[1].deps, vec![UnitRef::new("app", "util")]);
        assert_eq!(descs[1].libs, vec!["rt"]);
    }

    #[test]
    fn test_libs_not_found_names_only_missing() {
        let loader = MemoryLoader::new().with(shared_package());
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_dep("shared", ["strbuf", "nope"]),
        );

        match resolve(&loader, &pkg).unwrap_err() {
            ResolveError::LibsNotFound { package, names } => {
                assert_eq!(package, "shared");
                assert_eq!(names, vec!["nope"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_library_units_are_not_linkable() {
        let loader = MemoryLoader::new().with(shared_package());
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_dep("shared", ["shared_nif"]),
        );

        assert!(matches!(
            resolve(&loader, &pkg).unwrap_err(),
            ResolveError::LibsNotFound { .. }
        ));
    }

    #[test]
    fn test_errors_in_dependency_are_wrapped() {
        let loader = MemoryLoader::new().with(
            PackageManifest::new("broken", "/src/broken").with(RawDeclaration::library("empty")),
        );
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_dep("broken", ["empty"]),
        );

        let err = resolve(&loader, &pkg).unwrap_err();
        match &err {
            ResolveError::DependencyResolutionFailed { package, source } => {
                assert_eq!(package, "broken");
                assert!(matches!(**source, ResolveError::NoSourcesInNative(ref n) if n == "empty"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_multi_hop_errors_nest() {
        let loader = MemoryLoader::new()
            .with(
                PackageManifest::new("mid", "/src/mid").with(
                    RawDeclaration::library("glue")
                        .with_sources(["glue.c"])
                        .with_dep("leaf", ["missing"]),
                ),
            )
            .with(
                PackageManifest::new("leaf", "/src/leaf")
                    .with(RawDeclaration::library("present").with_sources(["p.c"])),
            );
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_dep("mid", ["glue"]),
        );

        let err = resolve(&loader, &pkg).unwrap_err();
        assert_eq!(err.package_chain(), vec!["mid"]);
        assert!(matches!(
            err.root_cause(),
            ResolveError::LibsNotFound { package, .. } if package == "leaf"
        ));
    }

    #[test]
    fn test_unknown_package_fails_to_load() {
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_dep("ghost", ["lib"]),
        );

        assert!(matches!(
            resolve(&MemoryLoader::new(), &pkg).unwrap_err(),
            ResolveError::ManifestLoad { ref package, .. } if package == "ghost"
        ));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let loader = MemoryLoader::new()
            .with(
                PackageManifest::new("a", "/src/a").with(
                    RawDeclaration::library("x")
                        .with_sources(["x.c"])
                        .with_dep("b", ["y"]),
                ),
            )
            .with(
                PackageManifest::new("b", "/src/b").with(
                    RawDeclaration::library("y")
                        .with_sources(["y.c"])
                        .with_dep("a", ["x"]),
                ),
            );
        let pkg = loader.load("a").unwrap();

        let err = resolve(&loader, &pkg).unwrap_err();
        match err.root_cause() {
            ResolveError::CyclicDependency { chain } => {
                assert_eq!(chain, &vec!["a:x", "b:y", "a:x"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let loader = MemoryLoader::new().with(shared_package());
        let pkg = PackageManifest::new("app", "/src/app").with(
            RawDeclaration::extension("nif")
                .with_sources(["nif.c"])
                .with_dep("shared", ["arena", "strbuf"]),
        );

        let nif = resolve(&loader, &pkg).unwrap().remove(0);
        assert_eq!(
            nif.deps,
            vec![
                UnitRef::new("shared", "arena"),
                UnitRef::new("shared", "strbuf")
            ]
        );
    }
}
