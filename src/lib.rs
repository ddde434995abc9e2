//! Object model over a git working tree.
//!
//! [`git::GitRepo`] drives the `git` executable and exposes commits,
//! branches, tags and remotes as typed values with lazily cached listings.
//!
//! ```no_run
//! use gitmodel::git::{GitRepo, HasCommits, Named};
//!
//! let repo = GitRepo::open(".")?;
//! let branch = repo.active_branch()?;
//! for commit in branch.commits(&repo)?.iter().take(5) {
//!     println!("{} {} {}", branch.name(), commit.short_hash(), commit.subject());
//! }
//! # Ok::<(), gitmodel::git::GitError>(())
//! ```

pub mod git;

#[cfg(test)]
mod test_utils;
