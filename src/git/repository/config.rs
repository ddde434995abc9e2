use serde::Serialize;

use super::core::{args, GitRepo};
use crate::git::{
    errors::{CommitError, Listing, Operation, Result},
    parse,
};

/// Author identity taken from the repository configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl GitRepo {
    /// Read a configuration value; `None` when the key is not set
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        self.require_repo()?;
        let argv = args(["config", "--get", key]);
        let output = self.git(&argv)?;
        match output.code {
            Some(0) => {
                let value = parse::text(&output.stdout, Listing::Scalar)?;
                Ok(Some(value.trim_end_matches('\n').to_string()))
            }
            // Exit code 1 means the key is missing
            Some(1) => Ok(None),
            _ => Err(self.fail(Operation::Config, &argv, &output)),
        }
    }

    /// Write a configuration value into the repository-local config
    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.require_repo()?;
        self.git_ok(Operation::Config, &args(["config", "--local", key, value]))?;
        tracing::debug!(key, "updated repository config");
        Ok(())
    }

    /// Set the author name and email used for commits and annotated tags
    pub fn set_user_config(&self, name: &str, email: &str) -> Result<()> {
        self.config_set("user.name", name)?;
        self.config_set("user.email", email)
    }

    /// The configured author identity, failing with a hint when incomplete
    pub fn user_identity(&self) -> Result<Identity> {
        let name = self.config_get("user.name")?.ok_or_else(|| CommitError::Rejected {
            message: "user.name is not set. Run: git config user.name \"Your Name\"".to_string(),
        })?;
        let email = self.config_get("user.email")?.ok_or_else(|| CommitError::Rejected {
            message: "user.email is not set. Run: git config user.email \"your@email.com\""
                .to_string(),
        })?;
        Ok(Identity { name, email })
    }
}
