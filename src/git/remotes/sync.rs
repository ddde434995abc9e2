use crate::git::{
    errors::{Operation, Result},
    repository::core::{args, GitRepo},
};

impl GitRepo {
    /// Fetch changes from a remote repository, pruning deleted branches
    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.require_repo()?;
        self.git_ok(
            Operation::Sync { remote },
            &args(["fetch", "--quiet", "--prune", remote]),
        )?;
        self.invalidate_remote_refs(remote);
        // Tags pointing into fetched history come along.
        self.cache.invalidate_tags();
        tracing::info!(remote, "fetched");
        Ok(())
    }

    /// Push a local branch to the same name on `remote`, optionally making
    /// the pushed branch its upstream
    pub fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
        self.require_repo()?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let mut argv = args(["push", "--quiet"]);
        if set_upstream {
            argv.push("--set-upstream".into());
        }
        argv.push(remote.into());
        argv.push(refspec.into());

        self.git_ok(Operation::Sync { remote }, &argv)?;
        self.invalidate_remote_refs(remote);
        if set_upstream {
            self.cache.branches.invalidate();
        }
        tracing::info!(remote, branch, set_upstream, "pushed");
        Ok(())
    }
}
