//! `berth resolve` command

use anyhow::{Context, Result};

use crate::cli::ResolveArgs;
use berth::ops::{format_descriptor, resolve_package};
use berth::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: ResolveArgs) -> Result<()> {
    let package = ctx.target_package(args.package.as_deref())?;
    let config = ctx.load_config();

    let loader = ctx.loader();
    let locator = config.runtime_locator();
    let descriptors = resolve_package(&loader, locator.as_ref(), &package)?;

    if args.json {
        let json = serde_json::to_string_pretty(&descriptors)
            .context("failed to serialize descriptors")?;
        println!("{}", json);
        return Ok(());
    }

    for (i, desc) in descriptors.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_descriptor(desc));
    }

    Ok(())
}
