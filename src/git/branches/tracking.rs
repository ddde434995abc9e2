use crate::git::{
    errors::{Listing, Operation, ParseError, Result},
    model::{Branch, Named},
    parse,
    repository::core::{args, GitRepo},
};

impl GitRepo {
    /// Make `branch` track `upstream`, e.g. `origin/master`
    pub fn set_upstream(&self, branch: &str, upstream: &str) -> Result<()> {
        self.require_repo()?;
        let flag = format!("--set-upstream-to={upstream}");
        self.git_ok(
            Operation::SetUpstream { branch },
            &args(["branch", "--quiet", flag.as_str(), branch]),
        )?;
        self.cache.branches.invalidate();
        tracing::info!(branch, upstream, "set upstream");
        Ok(())
    }

    pub fn unset_upstream(&self, branch: &str) -> Result<()> {
        self.require_repo()?;
        self.git_ok(
            Operation::SetUpstream { branch },
            &args(["branch", "--unset-upstream", branch]),
        )?;
        self.cache.branches.invalidate();
        Ok(())
    }

    /// The remote-tracking branch `branch` follows, if its upstream lives on
    /// a known remote and has been fetched
    pub fn tracking_branch(&self, branch: &Branch) -> Result<Option<Branch>> {
        let Some(upstream) = branch.upstream() else {
            return Ok(None);
        };
        for remote in self.remotes()?.iter() {
            let prefix = format!("{}/", remote.name());
            if upstream.starts_with(&prefix) {
                let tracked = self
                    .remote_branches(remote.name())?
                    .iter()
                    .find(|b| b.name() == upstream)
                    .cloned();
                return Ok(tracked);
            }
        }
        Ok(None)
    }

    /// Commits `branch` is (ahead, behind) its upstream; `None` without one
    pub fn ahead_behind(&self, branch: &Branch) -> Result<Option<(usize, usize)>> {
        let Some(tracked) = self.tracking_branch(branch)? else {
            return Ok(None);
        };
        let range = format!("{}...{}", branch.refname(), tracked.refname());
        let output = self.git_ok(
            Operation::Query,
            &args(["rev-list", "--left-right", "--count", range.as_str()]),
        )?;

        let text = parse::text(&output.stdout, Listing::Scalar)?.trim();
        let counts: Option<(usize, usize)> = text
            .split_once('\t')
            .and_then(|(a, b)| Some((a.parse().ok()?, b.parse().ok()?)));
        match counts {
            Some(counts) => Ok(Some(counts)),
            None => Err(ParseError::UnrecognizedLine {
                listing: Listing::Scalar,
                line: 1,
                content: text.to_string(),
            }
            .into()),
        }
    }
}
