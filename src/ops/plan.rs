//! Command planning operations.

use anyhow::Result;
use serde::Serialize;

use crate::builder::errors::CommandError;
use crate::builder::toolchain::Toolchain;
use crate::core::descriptor::{NativeDescriptor, UnitRef};
use crate::core::package::ProjectLoader;
use crate::core::runtime::RuntimeLocator;
use crate::core::unit::UnitKind;
use crate::ops::resolve::resolve_package;

/// The command sequence building one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitPlan {
    pub unit: UnitRef,
    pub kind: UnitKind,
    pub commands: Vec<String>,
}

/// Synthesize commands for every descriptor, in order.
///
/// All or nothing: the first pkg-config failure discards the whole plan.
pub fn plan_units(
    toolchain: &dyn Toolchain,
    descriptors: &[NativeDescriptor],
) -> Result<Vec<UnitPlan>, CommandError> {
    descriptors
        .iter()
        .map(|desc| {
            Ok(UnitPlan {
                unit: desc.id(),
                kind: desc.kind,
                commands: toolchain.commands(desc)?,
            })
        })
        .collect()
}

/// Resolve `package` and plan its commands.
///
/// A resolution failure produces no commands at all.
pub fn plan_package(
    loader: &dyn ProjectLoader,
    locator: &dyn RuntimeLocator,
    toolchain: &dyn Toolchain,
    package: &str,
) -> Result<Vec<UnitPlan>> {
    let descriptors = resolve_package(loader, locator, package)?;

    tracing::info!(
        "Planning {} units for `{}` with the {} toolchain",
        descriptors.len(),
        package,
        toolchain.platform().as_str()
    );

    Ok(plan_units(toolchain, &descriptors)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::{select_toolchain, UnixToolchain};
    use crate::core::layout::OutputLayout;
    use crate::core::package::{MemoryLoader, PackageManifest};
    use crate::core::runtime::StaticRuntime;
    use crate::core::unit::RawDeclaration;
    use crate::resolver::ResolveError;
    use crate::test_support::{runtime, shared_package, FakePkgConfig};

    fn toolchain(os: &str) -> Box<dyn Toolchain> {
        select_toolchain(
            os,
            UnixToolchain::new(
                "cc",
                "ar",
                OutputLayout::new("/build"),
                Box::new(FakePkgConfig::new().with("zlib", "-I/usr/include/zlib", "-lz")),
            ),
        )
    }

    fn app() -> PackageManifest {
        PackageManifest::new("app", "/src/app")
            .with(
                RawDeclaration::extension("nif")
                    .with_sources(["nif.c", "util.c"])
                    .with_dep("shared", ["arena"]),
            )
            .with(RawDeclaration::node("port").with_sources(["port.c"]))
    }

    #[test]
    fn test_plan_package() {
        let loader = MemoryLoader::new().with(shared_package()).with(app());
        let plans =
            plan_package(&loader, &StaticRuntime(runtime()), &*toolchain("freebsd"), "app").unwrap();

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].unit, UnitRef::new("app", "nif"));
        assert_eq!(plans[0].commands.len(), 4);
        assert_eq!(plans[1].kind, UnitKind::StandaloneNode);

        let link = plans[0].commands.last().unwrap();
        assert!(link.contains("\"/build/shared/arena.a\" \"/build/shared/strbuf.a\" -lz"));
    }

    #[test]
    fn test_darwin_plan() {
        let loader = MemoryLoader::new().with(shared_package()).with(app());
        let plans =
            plan_package(&loader, &StaticRuntime(runtime()), &*toolchain("macos"), "app").unwrap();

        let nif = &plans[0].commands;
        assert!(nif[1].contains("-fPIC"));
        assert!(nif[3].contains("-dynamiclib -undefined dynamic_lookup"));

        let port = &plans[1].commands;
        assert!(port.iter().all(|c| !c.contains("-fPIC")));
    }

    #[test]
    fn test_resolution_failure_yields_no_plan() {
        let loader = MemoryLoader::new().with(app());
        let err = plan_package(&loader, &StaticRuntime(runtime()), &*toolchain("linux"), "app")
            .unwrap_err();

        assert!(err.downcast_ref::<ResolveError>().is_some());
    }

    #[test]
    fn test_pkg_config_failure_yields_no_plan() {
        let loader = MemoryLoader::new().with(
            PackageManifest::new("app", "/src/app").with(
                RawDeclaration::extension("nif")
                    .with_sources(["nif.c"])
                    .with_pkg_configs(["libfoo"]),
            ),
        );
        let err = plan_package(&loader, &StaticRuntime(runtime()), &*toolchain("linux"), "app")
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::PkgConfigQueryFailed { .. })
        ));
    }
}
