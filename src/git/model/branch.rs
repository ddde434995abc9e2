use std::rc::Rc;

use serde::Serialize;

use super::{Commit, HasCommits, Named, Tag};
use crate::git::{errors::Result, GitRepo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchKind {
    Local,
    RemoteTracking { remote: String },
}

/// A branch reference.
///
/// Branches are plain values; commits and tags reachable from them are looked
/// up through the owning [`GitRepo`], which caches the listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    name: String,
    refname: String,
    upstream: Option<String>,
    kind: BranchKind,
}

impl Branch {
    pub(crate) fn local(name: impl Into<String>, upstream: Option<String>) -> Self {
        let name = name.into();
        Self {
            refname: format!("refs/heads/{name}"),
            name,
            upstream,
            kind: BranchKind::Local,
        }
    }

    /// `name` is the short form including the remote, e.g. `origin/master`
    pub(crate) fn remote_tracking(remote: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            refname: format!("refs/remotes/{name}"),
            name,
            upstream: None,
            kind: BranchKind::RemoteTracking {
                remote: remote.into(),
            },
        }
    }

    /// Fully qualified ref, e.g. `refs/heads/master`
    pub fn refname(&self) -> &str {
        &self.refname
    }

    /// Short name of the upstream branch, e.g. `origin/master`
    pub fn upstream(&self) -> Option<&str> {
        self.upstream.as_deref()
    }

    pub fn kind(&self) -> &BranchKind {
        &self.kind
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.kind, BranchKind::RemoteTracking { .. })
    }

    /// The remote this branch mirrors, for remote-tracking branches
    pub fn remote(&self) -> Option<&str> {
        match &self.kind {
            BranchKind::RemoteTracking { remote } => Some(remote),
            BranchKind::Local => None,
        }
    }

    /// Tags reachable from this branch's tip
    pub fn tags(&self, repo: &GitRepo) -> Result<Rc<Vec<Tag>>> {
        repo.tags_on(self)
    }

    pub fn has_tag(&self, repo: &GitRepo, name: &str) -> Result<bool> {
        Ok(self.tags(repo)?.iter().any(|t| t.name() == name))
    }

    /// Tag this branch's tip
    pub fn add_tag(&self, repo: &GitRepo, tag: &Tag) -> Result<Tag> {
        repo.add_tag_at(tag, Some(&self.refname))
    }

    /// Remove a tag; `false` when it was already absent
    pub fn remove_tag(&self, repo: &GitRepo, name: &str) -> Result<bool> {
        repo.remove_tag(name)
    }
}

impl Named for Branch {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasCommits for Branch {
    fn commits(&self, repo: &GitRepo) -> Result<Rc<Vec<Commit>>> {
        repo.commits_for(&self.refname)
    }
}
