use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::git::{
    errors::{translate, GitError, Operation, PathError, Result},
    model::cache::RepoCache,
    process::{GitCli, ProcessOutput, ProcessRunner, RunnerConfig},
};

/// Initialization state of the working-tree path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    Uninitialized,
    Initialized,
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOptions {
    /// Branch HEAD points to after `init`
    pub initial_branch: String,
}

impl Default for RepoOptions {
    fn default() -> Self {
        Self {
            initial_branch: "master".to_string(),
        }
    }
}

/// A repository on disk, driven through the git engine.
///
/// Listings (branches, tags, remotes, histories) are fetched lazily and cached
/// on the instance until a mutation invalidates them. Instances are not meant
/// to be shared across threads; use one instance per working tree.
pub struct GitRepo {
    path: PathBuf,
    state: RepoState,
    options: RepoOptions,
    runner: Box<dyn ProcessRunner>,
    pub(crate) cache: RepoCache,
}

impl GitRepo {
    /// A repository with no path yet, driving the system `git`
    pub fn new() -> Self {
        Self::with_runner(Box::new(GitCli::default()))
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self::with_runner(Box::new(GitCli::new(config)))
    }

    /// A repository with no path yet, driving the engine through `runner`
    pub fn with_runner(runner: Box<dyn ProcessRunner>) -> Self {
        Self {
            path: PathBuf::new(),
            state: RepoState::Uninitialized,
            options: RepoOptions::default(),
            runner,
            cache: RepoCache::default(),
        }
    }

    pub fn with_options(mut self, options: RepoOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> RepoState {
        self.state
    }

    /// Check if this is a bare repository
    pub fn is_bare(&self) -> bool {
        self.state == RepoState::Bare
    }

    pub fn options(&self) -> &RepoOptions {
        &self.options
    }

    pub(crate) fn set_location(&mut self, path: PathBuf, state: RepoState) {
        self.path = path;
        self.state = state;
        self.cache = RepoCache::default();
    }

    pub(crate) fn set_state(&mut self, state: RepoState) {
        self.state = state;
    }

    /// The path, once one has been set
    pub(crate) fn location(&self) -> Result<&Path> {
        if self.path.as_os_str().is_empty() {
            return Err(PathError::Unset.into());
        }
        Ok(&self.path)
    }

    /// Queries need a repository, bare or not.
    pub(crate) fn require_repo(&self) -> Result<&Path> {
        let path = self.location()?;
        match self.state {
            RepoState::Uninitialized => Err(PathError::NotInitialized {
                path: path.to_path_buf(),
            }
            .into()),
            RepoState::Initialized | RepoState::Bare => Ok(path),
        }
    }

    /// Working-tree mutations need a non-bare repository.
    pub(crate) fn require_work_tree(&self) -> Result<&Path> {
        let path = self.require_repo()?;
        if self.state == RepoState::Bare {
            return Err(PathError::Bare {
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(path)
    }

    /// Run the engine in the repository path and return whatever it produced.
    pub(crate) fn git(&self, args: &[OsString]) -> Result<ProcessOutput> {
        let cwd = self.location()?;
        let command = render(args);
        tracing::debug!(command = %command, cwd = %cwd.display(), "running git");

        let output = self.runner.run(args, cwd)?;
        tracing::debug!(command = %command, code = ?output.code, "git finished");
        Ok(output)
    }

    /// Run the engine and translate a non-zero exit into the error taxonomy.
    pub(crate) fn git_ok(&self, op: Operation<'_>, args: &[OsString]) -> Result<ProcessOutput> {
        let output = self.git(args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(self.fail(op, args, &output))
        }
    }

    pub(crate) fn fail(&self, op: Operation<'_>, args: &[OsString], output: &ProcessOutput) -> GitError {
        let error = translate(op, &render(args), output);
        tracing::debug!(error = %error, "git command failed");
        error
    }
}

impl Default for GitRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Build an argument vector from mixed string and path pieces
pub(crate) fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    items.into_iter().map(|s| s.as_ref().to_os_string()).collect()
}

fn render(args: &[OsString]) -> String {
    let mut rendered = String::from("git");
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
