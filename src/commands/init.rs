use anyhow::{Context as _, Result};
use console::style;
use gitmodel::git::RepoOptions;

use super::Context;

pub fn handle_init(ctx: &Context, bare: bool, initial_branch: Option<&str>) -> Result<()> {
    let mut repo = ctx.repo();
    if let Some(branch) = initial_branch {
        repo = repo.with_options(RepoOptions {
            initial_branch: branch.to_string(),
        });
    }

    repo.create(&ctx.repo_path, bare)
        .with_context(|| format!("Failed to initialize '{}'", ctx.repo_path.display()))?;

    println!(
        "{} Initialized {}repository in {}",
        style("✓").green().bold(),
        if repo.is_bare() { "bare " } else { "" },
        style(repo.path().display()).cyan()
    );

    if !repo.is_bare() && repo.user_identity().is_err() {
        println!(
            "{} No author identity configured; set user.name and user.email before committing",
            style("⚠").yellow().bold()
        );
    }
    Ok(())
}

pub fn handle_clone(ctx: &Context, url: &str) -> Result<()> {
    let mut repo = ctx.repo();
    repo.clone_or_open(url, &ctx.repo_path)
        .with_context(|| format!("Failed to clone '{url}'"))?;

    println!(
        "{} Repository ready at {}",
        style("✓").green().bold(),
        style(repo.path().display()).cyan()
    );
    Ok(())
}
