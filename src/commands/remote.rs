use anyhow::{anyhow, Context as _, Result};
use console::style;
use gitmodel::git::Named;

use super::{active_branch_name, print_json, Context};
use crate::cli::RemoteCommands;

pub fn handle_remote(ctx: &Context, command: &RemoteCommands) -> Result<()> {
    let repo = ctx.open()?;

    match command {
        RemoteCommands::List => {
            let remotes = repo.remotes().context("Failed to list remotes")?;
            if ctx.json {
                return print_json(remotes.as_slice());
            }
            if remotes.is_empty() {
                println!("{} No remotes configured", style("⚠").yellow());
            }
            for remote in remotes.iter() {
                println!("{}\t{}", style(remote.name()).cyan().bold(), remote.url());
                if remote.push_url() != remote.url() {
                    println!("\t{} (push)", remote.push_url());
                }
            }
        }
        RemoteCommands::Add { name, url } => {
            repo.add_remote(name, url)
                .with_context(|| format!("Failed to add remote '{name}'"))?;
            println!("{} Added remote: {}", style("✓").green().bold(), style(name).cyan());
        }
        RemoteCommands::Remove { name } => {
            repo.remove_remote(name)
                .with_context(|| format!("Failed to remove remote '{name}'"))?;
            println!("{} Removed remote: {}", style("✓").green().bold(), style(name).cyan());
        }
        RemoteCommands::Branches { name } => {
            let remote = repo
                .find_remote(name)?
                .ok_or_else(|| anyhow!("Remote '{name}' not found"))?;
            let branches = remote.branches(&repo)?;
            if ctx.json {
                return print_json(branches.as_slice());
            }
            for branch in branches.iter() {
                println!("  {}", style(branch.name()).cyan());
            }
        }
        RemoteCommands::Fetch { name } => {
            repo.fetch(name)
                .with_context(|| format!("Failed to fetch from '{name}'"))?;
            println!("{} Fetched {}", style("✓").green().bold(), style(name).cyan());
        }
        RemoteCommands::Push {
            remote,
            branch,
            set_upstream,
        } => {
            let branch = match branch {
                Some(branch) => branch.clone(),
                None => active_branch_name(&repo)?
                    .ok_or_else(|| anyhow!("HEAD is detached; name the branch to push"))?,
            };
            repo.push(remote, &branch, *set_upstream)
                .with_context(|| format!("Failed to push '{branch}' to '{remote}'"))?;
            println!(
                "{} Pushed {} to {}",
                style("✓").green().bold(),
                style(&branch).cyan(),
                style(remote).cyan()
            );
        }
    }
    Ok(())
}
