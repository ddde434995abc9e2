//! Entity model: commits, branches, tags and remotes
//!
//! Entities are immutable values. Capabilities are expressed as small traits
//! so each entity implements only what it has: a [`Branch`] has commits, a
//! [`Tag`] points at a single commit, every entity except [`Commit`] is named.

mod branch;
pub(crate) mod cache;
mod change;
mod commit;
mod remote;
mod tag;

use std::rc::Rc;

pub use branch::{Branch, BranchKind};
pub use change::{to_change_set, ChangeKind, ChangeSet, FileChange};
pub use commit::{Commit, Person};
pub use remote::Remote;
pub use tag::Tag;

use crate::git::{errors::Result, GitRepo};

pub trait Named {
    fn name(&self) -> &str;
}

/// Entities that produce an ordered (newest-first) commit sequence
pub trait HasCommits {
    fn commits(&self, repo: &GitRepo) -> Result<Rc<Vec<Commit>>>;

    /// The most recent commit, `None` when there are no commits yet
    fn tip(&self, repo: &GitRepo) -> Result<Option<Commit>> {
        Ok(self.commits(repo)?.first().cloned())
    }
}

/// Entities that resolve to exactly one commit
pub trait HasCommit {
    fn commit(&self, repo: &GitRepo) -> Result<Commit>;
}
