//! `berth plan` command

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use berth::builder::{host_os, select_toolchain};
use berth::ops::plan_package;
use berth::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: PlanArgs) -> Result<()> {
    let package = ctx.target_package(args.package.as_deref())?;
    let config = ctx.load_config();

    let os = match args.os.as_deref() {
        Some(os) => os,
        None => host_os(),
    };
    let toolchain = select_toolchain(os, config.unix_toolchain(ctx.workspace_root()));

    let loader = ctx.loader();
    let locator = config.runtime_locator();
    let plans = plan_package(&loader, locator.as_ref(), toolchain.as_ref(), &package)?;

    if args.json {
        let json = serde_json::to_string_pretty(&plans).context("failed to serialize plan")?;
        println!("{}", json);
        return Ok(());
    }

    for plan in &plans {
        println!("# {} ({})", plan.unit, plan.kind);
        for command in &plan.commands {
            println!("{}", command);
        }
    }

    Ok(())
}
