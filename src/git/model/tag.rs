use serde::Serialize;

use super::{Commit, HasCommit, Named};
use crate::git::{
    errors::{Result, TagError},
    GitRepo,
};

/// A tag, lightweight or annotated.
///
/// A tag built with [`Tag::new`] or [`Tag::annotated`] is only a request;
/// the hashes are filled in once the engine has created it and it is listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    name: String,
    message: Option<String>,
    hash: Option<String>,
    commit_hash: Option<String>,
}

impl Tag {
    /// A lightweight tag request
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: None,
            hash: None,
            commit_hash: None,
        }
    }

    /// An annotated tag request
    pub fn annotated(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn listed(
        name: String,
        message: Option<String>,
        hash: String,
        commit_hash: Option<String>,
    ) -> Self {
        Self {
            name,
            message,
            hash: Some(hash),
            commit_hash,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_annotated(&self) -> bool {
        self.message.is_some()
    }

    /// The tag object for annotated tags, the target commit for lightweight ones
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// The commit this tag resolves to
    pub fn commit_hash(&self) -> Option<&str> {
        self.commit_hash.as_deref()
    }
}

impl Named for Tag {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HasCommit for Tag {
    fn commit(&self, repo: &GitRepo) -> Result<Commit> {
        let hash = self.commit_hash.as_deref().ok_or_else(|| TagError::NoCommit {
            name: self.name.clone(),
        })?;
        repo.find_commit(hash)
    }
}
