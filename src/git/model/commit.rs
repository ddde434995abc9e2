use chrono::{DateTime, Utc};
use serde::Serialize;

use super::change::{to_change_set, ChangeSet, FileChange};

/// Author or committer identity with the time it was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub time: DateTime<Utc>,
}

/// A commit as reported by the engine.
///
/// Commits are values: the hash is whatever the engine assigned and nothing
/// here ever changes after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    hash: String,
    parents: Vec<String>,
    author: Person,
    committer: Person,
    message: String,
    changes: Vec<FileChange>,
}

impl Commit {
    pub(crate) fn new(
        hash: String,
        parents: Vec<String>,
        author: Person,
        committer: Person,
        message: String,
        changes: Vec<FileChange>,
    ) -> Self {
        Self {
            hash,
            parents,
            author,
            committer,
            message,
            changes,
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// First 7 characters of the hash
    pub fn short_hash(&self) -> &str {
        let end = self.hash.len().min(7);
        &self.hash[..end]
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// The first parent; `None` for a root commit
    pub fn parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    pub fn author(&self) -> &Person {
        &self.author
    }

    pub fn committer(&self) -> &Person {
        &self.committer
    }

    /// Full message without the trailing newline
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Touched paths in the order the engine reported them
    pub fn changes(&self) -> &[FileChange] {
        &self.changes
    }

    /// Touched paths mapped to how they changed
    pub fn files(&self) -> ChangeSet {
        to_change_set(self.changes.iter().map(|c| (c.path.as_str(), c.kind)))
    }
}
