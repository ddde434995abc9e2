use std::rc::Rc;

use crate::git::{
    errors::{Listing, Operation, RemoteError, Result},
    model::{Branch, Named, Remote},
    parse::{self, parse_remote_branches, parse_remotes, REMOTE_BRANCH_FORMAT},
    repository::core::{args, GitRepo},
};

impl GitRepo {
    /// Configured remotes, cached until one is added, removed or changed
    pub fn remotes(&self) -> Result<Rc<Vec<Remote>>> {
        self.require_repo()?;
        self.cache.remotes.get_or_load(|| {
            tracing::debug!("loading remote listing");
            let output = self.git_ok(Operation::Query, &args(["remote", "-v"]))?;
            Ok(parse_remotes(parse::text(&output.stdout, Listing::Remotes)?)?)
        })
    }

    pub fn find_remote(&self, name: &str) -> Result<Option<Remote>> {
        Ok(self.remotes()?.iter().find(|r| r.name() == name).cloned())
    }

    /// List all remote names only
    pub fn get_remote_names(&self) -> Result<Vec<String>> {
        Ok(self.remotes()?.iter().map(|r| r.name().to_string()).collect())
    }

    /// Add a remote repository
    pub fn add_remote(&self, name: &str, url: &str) -> Result<Remote> {
        self.require_repo()?;
        self.git_ok(Operation::Remote { name }, &args(["remote", "add", "--", name, url]))?;
        self.cache.remotes.invalidate();
        tracing::info!(remote = name, url, "added remote");

        self.find_remote(name)?.ok_or_else(|| {
            RemoteError::NotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Set the URL of an existing remote
    pub fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        self.require_repo()?;
        self.git_ok(Operation::Remote { name }, &args(["remote", "set-url", "--", name, url]))?;
        self.cache.remotes.invalidate();
        Ok(())
    }

    /// Remove a remote along with its remote-tracking branches
    pub fn remove_remote(&self, name: &str) -> Result<()> {
        self.require_repo()?;
        self.git_ok(Operation::Remote { name }, &args(["remote", "remove", name]))?;

        self.cache.remotes.invalidate();
        self.invalidate_remote_refs(name);
        // Upstreams pointing at the remote are dropped with it.
        self.cache.branches.invalidate();
        tracing::info!(remote = name, "removed remote");
        Ok(())
    }

    /// Remote-tracking branches of `remote`, as of the last fetch or push
    pub(crate) fn remote_branches(&self, remote: &str) -> Result<Rc<Vec<Branch>>> {
        self.require_repo()?;
        self.cache.remote_branches.get_or_load(remote, || {
            tracing::debug!(remote, "loading remote-tracking branches");
            let pattern = format!("refs/remotes/{remote}/");
            let output = self.git_ok(
                Operation::Query,
                &args(["for-each-ref", REMOTE_BRANCH_FORMAT, pattern.as_str()]),
            )?;
            Ok(parse_remote_branches(
                parse::text(&output.stdout, Listing::RemoteBranches)?,
                remote,
            )?)
        })
    }

    pub(crate) fn invalidate_remote_refs(&self, remote: &str) {
        self.cache.remote_branches.invalidate(remote);
        self.cache.commits.invalidate_prefix(&format!("refs/remotes/{remote}/"));
    }
}
