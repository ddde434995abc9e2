use anyhow::{anyhow, Context as _, Result};
use console::style;
use gitmodel::git::{GitRepo, Named, Tag};

use super::{print_json, Context};
use crate::cli::TagCommands;

pub fn handle_tag(ctx: &Context, command: &TagCommands) -> Result<()> {
    let repo = ctx.open()?;

    match command {
        TagCommands::List { branch } => {
            let tags = match branch {
                Some(name) => find_branch(&repo, name)?.tags(&repo)?,
                None => repo.tags()?,
            };
            if ctx.json {
                return print_json(tags.as_slice());
            }
            if tags.is_empty() {
                println!("{} No tags found", style("⚠").yellow());
            }
            for tag in tags.iter() {
                match tag.message() {
                    Some(message) => println!("{}  {}", style(tag.name()).cyan(), style(message).dim()),
                    None => println!("{}", style(tag.name()).cyan()),
                }
            }
        }
        TagCommands::Add {
            name,
            message,
            branch,
        } => {
            let request = match message {
                Some(message) => Tag::annotated(name.as_str(), message.as_str()),
                None => Tag::new(name.as_str()),
            };
            let created = match branch {
                Some(branch) => find_branch(&repo, branch)?.add_tag(&repo, &request),
                None => repo.add_tag(&request),
            }
            .with_context(|| format!("Failed to create tag '{name}'"))?;

            if ctx.json {
                return print_json(&created);
            }
            println!(
                "{} Created tag: {}",
                style("✓").green().bold(),
                style(created.name()).cyan()
            );
        }
        TagCommands::Remove { name } => {
            let removed = repo
                .remove_tag(name)
                .with_context(|| format!("Failed to remove tag '{name}'"))?;
            if removed {
                println!("{} Removed tag: {}", style("✓").green().bold(), style(name).cyan());
            } else {
                println!("{} No such tag: {}", style("⚠").yellow().bold(), style(name).yellow());
            }
        }
    }
    Ok(())
}

fn find_branch(repo: &GitRepo, name: &str) -> Result<gitmodel::git::Branch> {
    repo.find_branch(name)?
        .ok_or_else(|| anyhow!("Branch '{name}' not found"))
}
