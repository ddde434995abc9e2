use anyhow::{Context as _, Result};
use console::style;
use gitmodel::git::{GitRepo, HasCommits, Named};
use inquire::Select;

use super::{active_branch_name, print_json, Context};
use crate::tui::branch_display::{display_branches, BranchInfo};

pub fn handle_branch(ctx: &Context, list: bool, delete: Option<&str>, force: bool) -> Result<()> {
    let repo = ctx.open()?;

    if let Some(name) = delete {
        repo.delete_branch(name, force)
            .with_context(|| format!("Failed to delete branch '{name}'"))?;
        println!(
            "{} Deleted branch: {}",
            style("✓").green().bold(),
            style(name).cyan()
        );
        return Ok(());
    }

    if list || ctx.json {
        return list_branches(ctx, &repo);
    }

    let branches = repo.get_all_branches().context("Error getting branches")?;
    if branches.is_empty() {
        println!("No branches found");
        return Ok(());
    }

    match Select::new("Select a branch:", branches).prompt() {
        Ok(chosen_branch) => {
            repo.checkout(&chosen_branch, false)
                .with_context(|| format!("Error switching to branch '{chosen_branch}'"))?;
            println!(
                "{} Switched to branch: {}",
                style("✓").green().bold(),
                style(&chosen_branch).cyan()
            );
        }
        Err(err) => {
            eprintln!(
                "{} Selection cancelled: {}",
                style("⚠").yellow().bold(),
                style(err).yellow()
            );
        }
    }
    Ok(())
}

pub fn handle_checkout(ctx: &Context, branch: &str, create: bool) -> Result<()> {
    let repo = ctx.open()?;
    repo.checkout(branch, create)
        .with_context(|| format!("Error switching to branch '{branch}'"))?;

    println!(
        "{} Switched to branch: {}",
        style("✓").green().bold(),
        style(branch).cyan()
    );
    Ok(())
}

fn list_branches(ctx: &Context, repo: &GitRepo) -> Result<()> {
    let current = active_branch_name(repo)?;
    let mut infos = Vec::new();

    for branch in repo.branches().context("Error getting branches")? {
        let commit_info = branch
            .tip(repo)?
            .map(|c| format!("{} {}", c.short_hash(), c.subject()));
        infos.push(BranchInfo {
            name: branch.name().to_string(),
            is_current: current.as_deref() == Some(branch.name()),
            commit_info,
            upstream: branch.upstream().map(str::to_string),
            ahead_behind: repo.ahead_behind(&branch)?,
        });
    }

    if ctx.json {
        return print_json(&infos);
    }
    display_branches(&infos);
    Ok(())
}
