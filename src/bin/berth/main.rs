//! Berth CLI - plan native builds for runtime extension packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use berth::builder::CommandError;
use berth::resolver::ResolveError;
use berth::util::diagnostic::emit;
use berth::GlobalContext;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("berth=debug")
    } else {
        EnvFilter::new("berth=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    if let Some(ref workspace) = cli.workspace {
        ctx = ctx.with_workspace(workspace);
    }

    // Execute command
    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&ctx, args),
        Commands::Plan(args) => commands::plan::execute(&ctx, args),
    }
}

/// Structured errors get a full diagnostic; anything else prints its chain.
fn report(err: &anyhow::Error, color: bool) {
    if let Some(resolve) = err.downcast_ref::<ResolveError>() {
        emit(&resolve.to_diagnostic(), color);
    } else if let Some(command) = err.downcast_ref::<CommandError>() {
        emit(&command.to_diagnostic(), color);
    } else {
        eprintln!("error: {:#}", err);
    }
}
