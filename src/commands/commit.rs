use anyhow::{Context as _, Result};
use console::style;
use serde_json::json;

use super::{print_json, Context};
use crate::tui::status_display::display_changes;

pub fn handle_commit(ctx: &Context, message: &str, all: bool) -> Result<()> {
    let repo = ctx.open()?;

    let Some(files) = repo.commit(message, all).context("Failed to commit")? else {
        if ctx.json {
            return print_json(&json!({ "committed": false }));
        }
        println!("{} Nothing to commit", style("⚠").yellow().bold());
        return Ok(());
    };

    let commit = repo.last_commit().context("Failed to read the new commit")?;
    if ctx.json {
        return print_json(&json!({
            "committed": true,
            "hash": commit.hash(),
            "files": files,
        }));
    }

    println!(
        "{} Committed {} {}",
        style("✓").green().bold(),
        style(commit.short_hash()).yellow(),
        commit.subject()
    );
    display_changes(&files);
    Ok(())
}
