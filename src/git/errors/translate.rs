use std::path::PathBuf;

use super::{
    CheckoutError, CommitError, GitError, PathError, ProcessError, RemoteError, StagingError,
    TagError,
};
use crate::git::process::ProcessOutput;

/// What the failed engine invocation was trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation<'a> {
    Query,
    Config,
    Init { path: &'a std::path::Path },
    Clone { path: &'a std::path::Path },
    Stage,
    Remove,
    Commit,
    Checkout { branch: &'a str },
    CreateBranch { branch: &'a str },
    DeleteBranch { branch: &'a str },
    SetUpstream { branch: &'a str },
    AddTag { name: &'a str },
    RemoveTag { name: &'a str },
    Remote { name: &'a str },
    Sync { remote: &'a str },
}

/// Map a failed invocation onto the error taxonomy.
///
/// `command` is the rendered command line, used only for `ProcessError`
/// messages.
pub(crate) fn translate(op: Operation<'_>, command: &str, output: &ProcessOutput) -> GitError {
    let message = output.message();
    let lower = message.to_lowercase();

    if lower.contains("not a git repository") {
        return PathError::NotARepository { message }.into();
    }

    match op {
        Operation::Query | Operation::Config => ProcessError::Failed {
            command: command.to_string(),
            code: output.code,
            stderr: message,
        }
        .into(),
        Operation::Init { .. } => PathError::InitFailed { message }.into(),
        Operation::Clone { path } => {
            if lower.contains("already exists and is not an empty directory") {
                PathError::NotEmpty {
                    path: PathBuf::from(path),
                }
                .into()
            } else {
                PathError::InitFailed { message }.into()
            }
        }
        Operation::Stage | Operation::Remove => {
            if lower.contains("did not match any files") {
                StagingError::PathNotFound {
                    path: quoted_subject(&message).unwrap_or_default(),
                }
                .into()
            } else if lower.contains("is outside repository") {
                StagingError::OutsideRepository {
                    path: quoted_subject(&message).unwrap_or_default(),
                }
                .into()
            } else {
                StagingError::Rejected { message }.into()
            }
        }
        Operation::Commit => CommitError::Rejected { message }.into(),
        Operation::Checkout { branch } | Operation::CreateBranch { branch } => {
            if lower.contains("would be overwritten by checkout")
                || lower.contains("please commit your changes or stash them")
            {
                CheckoutError::Conflict { message }.into()
            } else if lower.contains("is not a valid branch name") {
                CheckoutError::InvalidName {
                    name: branch.to_string(),
                }
                .into()
            } else if lower.contains("did not match any file(s) known to git")
                || lower.contains("invalid reference")
            {
                CheckoutError::BranchNotFound {
                    name: branch.to_string(),
                }
                .into()
            } else {
                CheckoutError::Rejected { message }.into()
            }
        }
        Operation::DeleteBranch { branch } => {
            if lower.contains("cannot delete branch") && lower.contains("checked out") {
                CheckoutError::DeleteActive {
                    name: branch.to_string(),
                }
                .into()
            } else if lower.contains("not found") {
                CheckoutError::BranchNotFound {
                    name: branch.to_string(),
                }
                .into()
            } else {
                CheckoutError::Rejected { message }.into()
            }
        }
        Operation::SetUpstream { branch } => {
            if lower.contains("does not exist") && message.contains(branch) {
                CheckoutError::BranchNotFound {
                    name: branch.to_string(),
                }
                .into()
            } else {
                CheckoutError::Rejected { message }.into()
            }
        }
        Operation::AddTag { name } => {
            if lower.contains("already exists") {
                TagError::Exists {
                    name: name.to_string(),
                }
                .into()
            } else if lower.contains("is not a valid tag name") {
                TagError::InvalidName {
                    name: name.to_string(),
                }
                .into()
            } else {
                TagError::Rejected { message }.into()
            }
        }
        Operation::RemoveTag { .. } => TagError::Rejected { message }.into(),
        Operation::Remote { name } => {
            if lower.contains("already exists") {
                RemoteError::Exists {
                    name: name.to_string(),
                }
                .into()
            } else if lower.contains("no such remote") {
                RemoteError::NotFound {
                    name: name.to_string(),
                }
                .into()
            } else {
                RemoteError::Rejected { message }.into()
            }
        }
        Operation::Sync { remote } => {
            if lower.contains("does not appear to be a git repository")
                || lower.contains("could not read from remote repository")
            {
                RemoteError::Unreachable {
                    name: remote.to_string(),
                    message,
                }
                .into()
            } else {
                RemoteError::Rejected { message }.into()
            }
        }
    }
}

/// `git commit` refusing because nothing is staged.
pub(crate) fn is_nothing_to_commit(output: &ProcessOutput) -> bool {
    let text = format!("{}\n{}", output.stdout_lossy(), output.stderr_lossy());
    text.contains("nothing to commit")
        || text.contains("nothing added to commit")
        || text.contains("no changes added to commit")
}

/// `git tag -d` on a tag that is already gone.
pub(crate) fn is_missing_tag(output: &ProcessOutput) -> bool {
    let stderr = output.stderr_lossy();
    stderr.contains("tag '") && stderr.contains("not found")
}

/// The first `'...'` quoted token in an engine message.
fn quoted_subject(message: &str) -> Option<String> {
    let start = message.find('\'')? + 1;
    let len = message[start..].find('\'')?;
    Some(message[start..start + len].to_string())
}
