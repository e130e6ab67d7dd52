//! Configuration file support for Berth.
//!
//! Berth reads two configuration files:
//! - Global: `<config dir>/berth/config.toml` - User-wide defaults
//! - Project: `.berth/config.toml` - Workspace-specific overrides
//!
//! Project config takes precedence over global config. Every field is
//! optional; unset fields fall back to built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::pkg_config::PkgConfigCli;
use crate::builder::profile::BuildProfile;
use crate::builder::toolchain::UnixToolchain;
use crate::core::layout::{OutputLayout, DEFAULT_OUT_DIR};
use crate::core::runtime::{ErtsLocator, RuntimeInfo, RuntimeLocator, StaticRuntime};

/// Default C compiler driver.
pub const DEFAULT_CC: &str = "cc";

/// Default archiver.
pub const DEFAULT_AR: &str = "ar";

/// Default pkg-config executable.
pub const DEFAULT_PKG_CONFIG: &str = "pkg-config";

/// Berth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compiler, archiver and pkg-config programs
    pub toolchain: ToolchainSettings,

    /// Compile defaults
    pub profile: ProfileConfig,

    /// Host runtime directories
    pub runtime: RuntimeConfig,

    /// Output settings
    pub build: BuildConfig,
}

/// Toolchain programs and extra flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// C compiler driver (e.g., clang)
    pub cc: Option<String>,

    /// Archiver (e.g., llvm-ar)
    pub ar: Option<String>,

    /// pkg-config executable
    pub pkg_config: Option<PathBuf>,

    /// Additional flags for every compile command
    pub cflags: Option<Vec<String>>,

    /// Additional flags for every link command
    pub ldflags: Option<Vec<String>>,
}

/// Overrides for [`BuildProfile`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub c_std: Option<String>,
    pub opt_level: Option<String>,
    pub debug: Option<bool>,
    pub warnings: Option<Vec<String>>,
}

/// Host runtime location.
///
/// Explicit `includes`/`lib_dirs` skip probing entirely. Otherwise the
/// runtime is asked for its directories through `erl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub includes: Option<Vec<PathBuf>>,
    pub lib_dirs: Option<Vec<PathBuf>>,
    pub erl: Option<PathBuf>,
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Artifact root, relative to the workspace unless absolute
    pub out_dir: Option<PathBuf>,

    /// Suffix of loadable extensions
    pub extension_suffix: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        merge_opt(&mut self.toolchain.cc, other.toolchain.cc);
        merge_opt(&mut self.toolchain.ar, other.toolchain.ar);
        merge_opt(&mut self.toolchain.pkg_config, other.toolchain.pkg_config);
        merge_opt(&mut self.toolchain.cflags, other.toolchain.cflags);
        merge_opt(&mut self.toolchain.ldflags, other.toolchain.ldflags);

        merge_opt(&mut self.profile.c_std, other.profile.c_std);
        merge_opt(&mut self.profile.opt_level, other.profile.opt_level);
        merge_opt(&mut self.profile.debug, other.profile.debug);
        merge_opt(&mut self.profile.warnings, other.profile.warnings);

        merge_opt(&mut self.runtime.includes, other.runtime.includes);
        merge_opt(&mut self.runtime.lib_dirs, other.runtime.lib_dirs);
        merge_opt(&mut self.runtime.erl, other.runtime.erl);

        merge_opt(&mut self.build.out_dir, other.build.out_dir);
        merge_opt(&mut self.build.extension_suffix, other.build.extension_suffix);
    }

    pub fn cc(&self) -> &str {
        self.toolchain.cc.as_deref().unwrap_or(DEFAULT_CC)
    }

    pub fn ar(&self) -> &str {
        self.toolchain.ar.as_deref().unwrap_or(DEFAULT_AR)
    }

    /// The configured pkg-config, or whichever one is on PATH.
    pub fn pkg_config(&self) -> PkgConfigCli {
        match &self.toolchain.pkg_config {
            Some(program) => PkgConfigCli::new(program),
            None => PkgConfigCli::detect(DEFAULT_PKG_CONFIG),
        }
    }

    /// The build profile with configured overrides applied.
    pub fn build_profile(&self) -> BuildProfile {
        let mut profile = BuildProfile::default();
        if let Some(ref c_std) = self.profile.c_std {
            profile.c_std = c_std.clone();
        }
        if let Some(ref opt_level) = self.profile.opt_level {
            profile.opt_level = opt_level.clone();
        }
        if let Some(debug) = self.profile.debug {
            profile.debug = debug;
        }
        if let Some(ref warnings) = self.profile.warnings {
            profile.warnings = warnings.clone();
        }
        profile
    }

    /// Artifact layout rooted under `workspace_root`.
    pub fn output_layout(&self, workspace_root: &Path) -> OutputLayout {
        let out_dir = self
            .build
            .out_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
        OutputLayout::new(workspace_root.join(out_dir))
    }

    /// The runtime locator these settings call for.
    pub fn runtime_locator(&self) -> Box<dyn RuntimeLocator> {
        if self.runtime.includes.is_some() || self.runtime.lib_dirs.is_some() {
            return Box::new(StaticRuntime(RuntimeInfo::new(
                self.runtime.includes.clone().unwrap_or_default(),
                self.runtime.lib_dirs.clone().unwrap_or_default(),
            )));
        }

        if let Some(ref erl) = self.runtime.erl {
            return Box::new(ErtsLocator::new(erl));
        }

        match ErtsLocator::detect() {
            Some(locator) => Box::new(locator),
            None => {
                tracing::warn!("`erl` not found on PATH; building without runtime directories");
                Box::new(StaticRuntime::default())
            }
        }
    }

    /// The generic toolchain these settings describe.
    pub fn unix_toolchain(&self, workspace_root: &Path) -> UnixToolchain {
        let mut toolchain = UnixToolchain::new(
            self.cc(),
            self.ar(),
            self.output_layout(workspace_root),
            Box::new(self.pkg_config()),
        )
        .with_profile(self.build_profile())
        .with_extra_flags(
            self.toolchain.cflags.clone().unwrap_or_default(),
            self.toolchain.ldflags.clone().unwrap_or_default(),
        );

        if let Some(ref suffix) = self.build.extension_suffix {
            toolchain = toolchain.with_extension_suffix(suffix.as_str());
        }

        toolchain
    }
}

fn merge_opt<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config path (e.g. `~/.config/berth/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "berth").map(|d| d.config_dir().join("config.toml"))
}

/// Get the project config path (.berth/config.toml).
pub fn project_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(".berth").join("config.toml")
}
