use anyhow::{Context as _, Result};

use super::{active_branch_name, print_json, Context};
use crate::tui::status_display::display_status;

pub fn handle_status(ctx: &Context) -> Result<()> {
    let repo = ctx.open()?;
    let changes = repo.status().context("Failed to read status")?;

    if ctx.json {
        return print_json(&changes);
    }
    let branch = active_branch_name(&repo)?;
    display_status(branch.as_deref(), &changes);
    Ok(())
}
