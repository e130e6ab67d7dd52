//! Compile defaults shared by every compile command.

/// Default C language standard.
pub const DEFAULT_C_STD: &str = "c99";

/// Default optimization level.
pub const DEFAULT_OPT_LEVEL: &str = "3";

/// Default warning flags.
pub const DEFAULT_WARNINGS: &[&str] = &["-Wall", "-Wextra"];

/// Language standard, optimization, debug info and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProfile {
    /// C standard, as passed to `-std=`
    pub c_std: String,

    /// Optimization level (0, 1, 2, 3, s, z)
    pub opt_level: String,

    /// Emit debug information (`-g`)
    pub debug: bool,

    /// Warning flags, emitted first
    pub warnings: Vec<String>,
}

impl Default for BuildProfile {
    fn default() -> Self {
        BuildProfile {
            c_std: DEFAULT_C_STD.to_string(),
            opt_level: DEFAULT_OPT_LEVEL.to_string(),
            debug: true,
            warnings: DEFAULT_WARNINGS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl BuildProfile {
    pub fn std_flag(&self) -> String {
        format!("-std={}", self.c_std)
    }

    pub fn opt_flag(&self) -> String {
        format!("-O{}", self.opt_level)
    }

    pub fn debug_flag(&self) -> Option<&'static str> {
        self.debug.then_some("-g")
    }
}
