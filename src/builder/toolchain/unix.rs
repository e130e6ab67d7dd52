//! Generic Unix command synthesis.

use std::path::{Path, PathBuf};

use crate::builder::errors::CommandError;
use crate::builder::pkg_config::PkgConfig;
use crate::builder::profile::BuildProfile;
use crate::core::descriptor::NativeDescriptor;
use crate::core::layout::{with_suffix, OutputLayout};
use crate::core::unit::UnitKind;
use crate::util::hash::object_file_name;
use crate::util::shell::quote_path;

use super::{CommandSpec, Toolchain, ToolchainPlatform};

/// Default suffix of loadable extensions.
pub const DEFAULT_EXTENSION_SUFFIX: &str = ".so";

/// Generic Unix toolchain: a C compiler driver plus `ar`.
#[derive(Debug)]
pub struct UnixToolchain {
    cc: String,
    ar: String,
    layout: OutputLayout,
    profile: BuildProfile,
    extension_suffix: String,
    /// Extra compile flags for every unit
    extra_cflags: Vec<String>,
    /// Extra link flags for every linked unit
    extra_ldflags: Vec<String>,
    pkg_config: Box<dyn PkgConfig>,
}

impl UnixToolchain {
    /// Create a toolchain with the default profile and no extra flags.
    pub fn new(
        cc: impl Into<String>,
        ar: impl Into<String>,
        layout: OutputLayout,
        pkg_config: Box<dyn PkgConfig>,
    ) -> Self {
        UnixToolchain {
            cc: cc.into(),
            ar: ar.into(),
            layout,
            profile: BuildProfile::default(),
            extension_suffix: DEFAULT_EXTENSION_SUFFIX.to_string(),
            extra_cflags: Vec::new(),
            extra_ldflags: Vec::new(),
            pkg_config,
        }
    }

    pub fn with_profile(mut self, profile: BuildProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_extension_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.extension_suffix = suffix.into();
        self
    }

    /// Flags added to every compile and every link command.
    pub fn with_extra_flags(mut self, cflags: Vec<String>, ldflags: Vec<String>) -> Self {
        self.extra_cflags = cflags;
        self.extra_ldflags = ldflags;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn profile(&self) -> &BuildProfile {
        &self.profile
    }

    /// Compiler program string with this toolchain's and the caller's flags.
    pub fn compile_program(&self, extra: &[&str]) -> String {
        program_string(&self.cc, &self.extra_cflags, extra)
    }

    /// Link driver program string with this toolchain's and the caller's flags.
    pub fn link_program(&self, extra: &[&str]) -> String {
        program_string(&self.cc, &self.extra_ldflags, extra)
    }

    /// Emit the command sequence for `desc` using the given program strings.
    pub fn synthesize(
        &self,
        desc: &NativeDescriptor,
        compile_program: &str,
        link_program: &str,
    ) -> Result<Vec<String>, CommandError> {
        let obj_dir = self.layout.object_dir(&desc.package, &desc.name);
        let pkg_cflags = self.pkg_config.cflags(&desc.pkg_configs)?;

        let mut commands = Vec::with_capacity(desc.sources.len() + 2);
        commands.push(format!("mkdir -p {}", quote_path(&obj_dir)));

        let mut objects = Vec::with_capacity(desc.sources.len());
        for source in &desc.sources {
            let object = obj_dir.join(object_file_name(source));
            commands.push(
                self.compile_command(compile_program, desc, source, &object, &pkg_cflags)
                    .to_shell(),
            );
            objects.push(object);
        }

        commands.push(self.link_command(link_program, desc, &objects)?.to_shell());

        Ok(commands)
    }

    fn compile_command(
        &self,
        program: &str,
        desc: &NativeDescriptor,
        source: &Path,
        object: &Path,
        pkg_cflags: &str,
    ) -> CommandSpec {
        let mut cmd = CommandSpec::new(program)
            .args(self.profile.warnings.iter().cloned())
            .arg("-c")
            .arg(self.profile.std_flag())
            .arg(self.profile.opt_flag());

        if let Some(debug) = self.profile.debug_flag() {
            cmd = cmd.arg(debug);
        }

        cmd = cmd.arg("-o").path(object);

        for dir in &desc.includes {
            cmd = cmd.arg(format!("-I{}", quote_path(dir)));
        }

        cmd.raw(pkg_cflags).path(source)
    }

    fn link_command(
        &self,
        program: &str,
        desc: &NativeDescriptor,
        objects: &[PathBuf],
    ) -> Result<CommandSpec, CommandError> {
        let output = self.layout.artifact_path(&desc.package, &desc.name);

        match desc.kind {
            UnitKind::Library => Ok(CommandSpec::new(&self.ar)
                .arg("rcs")
                .path(&self.layout.archive_path(&desc.package, &desc.name))
                .paths(objects.iter().map(PathBuf::as_path))),
            UnitKind::LoadableExtension => self.link_binary(
                program,
                desc,
                &with_suffix(&output, &self.extension_suffix),
                objects,
            ),
            UnitKind::StandaloneNode => self.link_binary(program, desc, &output, objects),
        }
    }

    /// Objects, then dependency archives, then library flags, so a
    /// single-pass linker sees every reference before its definition.
    fn link_binary(
        &self,
        program: &str,
        desc: &NativeDescriptor,
        output: &Path,
        objects: &[PathBuf],
    ) -> Result<CommandSpec, CommandError> {
        let pkg_libs = self.pkg_config.libs(&desc.pkg_configs)?;

        let mut cmd = CommandSpec::new(program)
            .arg("-o")
            .path(output)
            .paths(objects.iter().map(PathBuf::as_path));

        for dep in &desc.deps {
            cmd = cmd.path(&self.layout.archive_path(&dep.package, &dep.name));
        }

        cmd = cmd.raw(&pkg_libs);

        for dir in &desc.lib_dirs {
            cmd = cmd.arg(format!("-L{}", quote_path(dir)));
        }

        for lib in &desc.libs {
            cmd = cmd.arg(format!("-l{}", lib));
        }

        Ok(cmd)
    }
}

impl Toolchain for UnixToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Unix
    }

    fn commands(&self, desc: &NativeDescriptor) -> Result<Vec<String>, CommandError> {
        self.synthesize(desc, &self.compile_program(&[]), &self.link_program(&[]))
    }
}

fn program_string(program: &str, own: &[String], extra: &[&str]) -> String {
    let mut parts = vec![program];
    parts.extend(own.iter().map(String::as_str));
    parts.extend_from_slice(extra);
    parts.join(" ")
}
