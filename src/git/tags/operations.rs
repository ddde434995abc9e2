use std::rc::Rc;

use crate::git::{
    errors::{is_missing_tag, Listing, Operation, Result, TagError},
    model::{Branch, Named, Tag},
    parse::{self, parse_tags, TAG_FORMAT},
    repository::core::{args, GitRepo},
};

impl GitRepo {
    /// All tags in the repository, cached until a tag is added or removed
    pub fn tags(&self) -> Result<Rc<Vec<Tag>>> {
        self.require_repo()?;
        self.cache.tags.get_or_load(|| {
            tracing::debug!("loading tag listing");
            self.list_tags(None)
        })
    }

    /// Tags whose commit is reachable from `branch`
    pub(crate) fn tags_on(&self, branch: &Branch) -> Result<Rc<Vec<Tag>>> {
        self.require_repo()?;
        self.cache.branch_tags.get_or_load(branch.refname(), || {
            tracing::debug!(branch = branch.name(), "loading branch tags");
            self.list_tags(Some(branch.refname()))
        })
    }

    fn list_tags(&self, merged_into: Option<&str>) -> Result<Vec<Tag>> {
        let mut argv = args(["for-each-ref", TAG_FORMAT]);
        if let Some(refname) = merged_into {
            argv.push(format!("--merged={refname}").into());
        }
        argv.push("refs/tags".into());

        let output = self.git_ok(Operation::Query, &argv)?;
        Ok(parse_tags(parse::text(&output.stdout, Listing::Tags)?)?)
    }

    pub fn has_tag(&self, name: &str) -> Result<bool> {
        Ok(self.tags()?.iter().any(|t| t.name() == name))
    }

    pub fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        Ok(self.tags()?.iter().find(|t| t.name() == name).cloned())
    }

    /// Create `tag` at HEAD, annotated when it carries a message
    pub fn add_tag(&self, tag: &Tag) -> Result<Tag> {
        self.add_tag_at(tag, None)
    }

    /// Create `tag` at `target` (any revision), or at HEAD when `None`.
    ///
    /// Returns the tag as listed by the engine, with its hashes filled in.
    pub fn add_tag_at(&self, tag: &Tag, target: Option<&str>) -> Result<Tag> {
        self.require_repo()?;
        let name = tag.name();
        if self.has_tag(name)? {
            return Err(TagError::Exists {
                name: name.to_string(),
            }
            .into());
        }

        let mut argv = match tag.message() {
            Some(message) => args(["tag", "-a", name, "-m", message]),
            None => args(["tag", name]),
        };
        if let Some(target) = target {
            argv.push(target.into());
        }
        self.git_ok(Operation::AddTag { name }, &argv)?;
        self.cache.invalidate_tags();
        tracing::info!(tag = name, annotated = tag.is_annotated(), "created tag");

        self.find_tag(name)?.ok_or_else(|| {
            TagError::Rejected {
                message: format!("tag '{name}' is not listed after creation"),
            }
            .into()
        })
    }

    /// Delete a tag; returns `false` when no such tag existed
    pub fn remove_tag(&self, name: &str) -> Result<bool> {
        self.require_repo()?;
        let argv = args(["tag", "-d", name]);
        let output = self.git(&argv)?;

        if output.success() {
            self.cache.invalidate_tags();
            tracing::info!(tag = name, "removed tag");
            return Ok(true);
        }
        if is_missing_tag(&output) {
            // The cached listing may have been stale.
            self.cache.invalidate_tags();
            tracing::debug!(tag = name, "tag already absent");
            return Ok(false);
        }
        Err(self.fail(Operation::RemoveTag { name }, &argv, &output))
    }
}
