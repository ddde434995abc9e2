use std::rc::Rc;

use serde::Serialize;

use super::{Branch, Named};
use crate::git::{errors::Result, GitRepo};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    name: String,
    url: String,
    push_url: Option<String>,
}

impl Remote {
    pub(crate) fn new(name: String, url: String, push_url: Option<String>) -> Self {
        Self {
            name,
            url,
            push_url,
        }
    }

    /// Fetch URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Push URL, falling back to the fetch URL
    pub fn push_url(&self) -> &str {
        self.push_url.as_deref().unwrap_or(&self.url)
    }

    /// Remote-tracking branches mirrored from this remote
    pub fn branches(&self, repo: &GitRepo) -> Result<Rc<Vec<Branch>>> {
        repo.remote_branches(&self.name)
    }
}

impl Named for Remote {
    fn name(&self) -> &str {
        &self.name
    }
}
