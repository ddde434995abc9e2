//! Git working-tree object model
//!
//! [`GitRepo`] is the aggregate; its operations are split by domain:
//!
//! - `repository`: Path management (set path, open, init, clone) and config
//! - `commits`: Staging, status, commits and history
//! - `branches`: Branch listing, checkout, deletion and upstream tracking
//! - `tags`: Tag listing, creation and removal
//! - `remotes`: Remote listing, remote-tracking branches, fetch and push
//!
//! Supporting modules:
//!
//! - `model`: Commit, Branch, Tag and Remote values plus capability traits
//! - `parse`: Strict parsers for engine listings
//! - `process`: The process boundary to the `git` executable
//! - `errors`: Error taxonomy and engine failure translation

pub mod branches;
pub mod commits;
pub mod errors;
pub mod model;
pub mod parse;
pub mod process;
pub mod remotes;
pub mod repository;
pub mod tags;

// Re-export the main types
pub use errors::{GitError, Result};
pub use model::{
    Branch, BranchKind, ChangeKind, ChangeSet, Commit, FileChange, HasCommit, HasCommits, Named,
    Person, Remote, Tag,
};
pub use process::{GitCli, ProcessOutput, ProcessRunner, RunnerConfig};
pub use repository::{GitRepo, Identity, RepoOptions, RepoState};
