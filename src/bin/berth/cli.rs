//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Berth - plan native builds for runtime extension packages
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Workspace root (defaults to the current directory, or its parent
    /// when run inside a package)
    #[arg(long, global = true, env = "BERTH_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a package's native units and print the merged descriptors
    Resolve(ResolveArgs),

    /// Print the commands that would build a package's native units
    #[command(alias = "commands")]
    Plan(PlanArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Package to resolve (defaults to the current package)
    pub package: Option<String>,

    /// Emit descriptors as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Package to plan (defaults to the current package)
    pub package: Option<String>,

    /// Target OS (e.g. linux, macos); defaults to the host
    #[arg(long)]
    pub os: Option<String>,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}
