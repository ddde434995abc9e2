use std::path::PathBuf;

use anyhow::{Context as _, Result};
use console::style;

use super::Context;

pub fn handle_add(ctx: &Context, paths: &[PathBuf]) -> Result<()> {
    let repo = ctx.open()?;
    repo.add(paths).context("Failed to stage paths")?;

    println!(
        "{} Staged {} path(s)",
        style("✓").green().bold(),
        paths.len()
    );
    Ok(())
}

pub fn handle_rm(ctx: &Context, paths: &[PathBuf]) -> Result<()> {
    let repo = ctx.open()?;
    repo.rm(paths).context("Failed to remove paths")?;

    println!(
        "{} Removed {} path(s)",
        style("✓").green().bold(),
        paths.len()
    );
    Ok(())
}
