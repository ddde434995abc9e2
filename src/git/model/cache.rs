//! Per-repository caches of engine listings.
//!
//! Each cache is filled by exactly one engine call on first access and kept
//! until the mutation that can affect it invalidates it. There is no global
//! flush.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{Branch, Commit, Remote, Tag};
use crate::git::errors::Result;
use crate::git::parse::BranchListing;

pub(crate) struct Lazy<T> {
    slot: RefCell<Option<Rc<T>>>,
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }
}

impl<T> Lazy<T> {
    pub(crate) fn get_or_load(&self, load: impl FnOnce() -> Result<T>) -> Result<Rc<T>> {
        if let Some(value) = self.slot.borrow().as_ref() {
            tracing::trace!("cache hit");
            return Ok(Rc::clone(value));
        }
        let value = Rc::new(load()?);
        *self.slot.borrow_mut() = Some(Rc::clone(&value));
        Ok(value)
    }

    pub(crate) fn peek(&self) -> Option<Rc<T>> {
        self.slot.borrow().clone()
    }

    pub(crate) fn invalidate(&self) {
        self.slot.borrow_mut().take();
    }
}

pub(crate) struct Keyed<T> {
    slots: RefCell<HashMap<String, Rc<T>>>,
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
        }
    }
}

impl<T> Keyed<T> {
    pub(crate) fn get_or_load(&self, key: &str, load: impl FnOnce() -> Result<T>) -> Result<Rc<T>> {
        if let Some(value) = self.slots.borrow().get(key) {
            tracing::trace!(key, "cache hit");
            return Ok(Rc::clone(value));
        }
        let value = Rc::new(load()?);
        self.slots
            .borrow_mut()
            .insert(key.to_string(), Rc::clone(&value));
        Ok(value)
    }

    pub(crate) fn invalidate(&self, key: &str) {
        self.slots.borrow_mut().remove(key);
    }

    pub(crate) fn invalidate_prefix(&self, prefix: &str) {
        self.slots.borrow_mut().retain(|key, _| !key.starts_with(prefix));
    }

    pub(crate) fn clear(&self) {
        self.slots.borrow_mut().clear();
    }
}

#[derive(Default)]
pub(crate) struct RepoCache {
    pub(crate) branches: Lazy<BranchListing>,
    pub(crate) tags: Lazy<Vec<Tag>>,
    /// Tags reachable from a branch, keyed by refname
    pub(crate) branch_tags: Keyed<Vec<Tag>>,
    pub(crate) remotes: Lazy<Vec<Remote>>,
    /// Remote-tracking branches, keyed by remote name
    pub(crate) remote_branches: Keyed<Vec<Branch>>,
    /// Newest-first history, keyed by refname
    pub(crate) commits: Keyed<Vec<Commit>>,
    /// Individual commits by full hash; never invalidated
    pub(crate) commits_by_hash: Keyed<Commit>,
}

impl RepoCache {
    pub(crate) fn invalidate_tags(&self) {
        tracing::debug!("invalidating tag caches");
        self.tags.invalidate();
        self.branch_tags.clear();
    }
}
