pub mod branch;
pub mod commit;
pub mod init;
pub mod log;
pub mod remote;
pub mod stage;
pub mod status;
pub mod tag;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use gitmodel::git::{GitError, GitRepo, RepoState, RunnerConfig};
use serde::Serialize;

use crate::cli::Cli;

/// Settings shared by every subcommand
pub struct Context {
    pub repo_path: PathBuf,
    pub runner: RunnerConfig,
    pub json: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            repo_path: cli.repo.clone(),
            runner: RunnerConfig {
                program: cli.git.clone(),
                timeout: cli.timeout.map(Duration::from_secs),
                ..RunnerConfig::default()
            },
            json: cli.json,
        }
    }

    /// A repository instance with no path set yet
    pub fn repo(&self) -> GitRepo {
        GitRepo::with_config(self.runner.clone())
    }

    /// Open the repository at the configured path
    pub fn open(&self) -> Result<GitRepo> {
        let mut repo = self.repo();
        repo.set_path(&self.repo_path, false, false)
            .with_context(|| format!("Failed to open '{}'", self.repo_path.display()))?;
        if repo.state() == RepoState::Uninitialized {
            bail!(
                "'{}' is not a git repository (run `gm init` first)",
                self.repo_path.display()
            );
        }
        Ok(repo)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}

/// Name of the checked-out branch, `None` when HEAD is detached
pub fn active_branch_name(repo: &GitRepo) -> Result<Option<String>> {
    match repo.get_current_branch() {
        Ok(name) => Ok(Some(name)),
        Err(GitError::DetachedHead) => Ok(None),
        Err(e) => Err(e).context("Failed to resolve the active branch"),
    }
}
