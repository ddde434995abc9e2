use anyhow::{anyhow, Context as _, Result};
use gitmodel::git::HasCommits;

use super::{print_json, Context};
use crate::tui::log_display::display_log;

pub fn handle_log(ctx: &Context, branch: Option<&str>, max_count: Option<usize>) -> Result<()> {
    let repo = ctx.open()?;
    let branch = match branch {
        Some(name) => repo
            .find_branch(name)?
            .ok_or_else(|| anyhow!("Branch '{name}' not found"))?,
        None => repo.active_branch().context("Failed to resolve the active branch")?,
    };

    let commits = branch.commits(&repo).context("Failed to read history")?;
    let shown = &commits[..max_count.unwrap_or(commits.len()).min(commits.len())];

    if ctx.json {
        return print_json(shown);
    }
    display_log(shown);
    Ok(())
}
