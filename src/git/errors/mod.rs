//! Error taxonomy for repository operations
//!
//! Every failure surfaced by the library is a [`GitError`]. Each variant wraps
//! the error family of the operation that failed, so callers can match on the
//! family (`GitError::Checkout(_)`) or on the precise cause
//! (`GitError::Checkout(CheckoutError::BranchNotFound { .. })`).
//!
//! Engine failures are mapped onto this taxonomy by [`translate`], the only
//! place that inspects exit codes and stderr text.

mod translate;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub(crate) use translate::{is_missing_tag, is_nothing_to_commit, translate, Operation};

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, GitError>;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("HEAD is detached and does not point to a branch")]
    DetachedHead,
}

/// The working tree is missing, invalid, or cannot be created
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("path does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("path exists but is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("no repository has been initialized at {path}")]
    NotInitialized { path: PathBuf },

    #[error("no path has been set for this repository")]
    Unset,

    #[error("operation requires a working tree but {path} is a bare repository")]
    Bare { path: PathBuf },

    #[error("{path} already contains a repository")]
    AlreadyInitialized { path: PathBuf },

    #[error("destination {path} already exists and is not empty")]
    NotEmpty { path: PathBuf },

    #[error("not a git repository: {message}")]
    NotARepository { message: String },

    #[error("failed to initialize repository: {message}")]
    InitFailed { message: String },

    #[error("filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which listing a parse failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Status,
    Log,
    Branches,
    RemoteBranches,
    Tags,
    Remotes,
    Scalar,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Listing::Status => "status",
            Listing::Log => "log",
            Listing::Branches => "branch",
            Listing::RemoteBranches => "remote branch",
            Listing::Tags => "tag",
            Listing::Remotes => "remote",
            Listing::Scalar => "scalar",
        };
        f.write_str(name)
    }
}

/// Engine output did not match the expected listing shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unrecognized {listing} line {line}: {content:?}")]
    UnrecognizedLine {
        listing: Listing,
        line: usize,
        content: String,
    },

    #[error("{listing} listing marks {count} active entries, expected exactly one")]
    ActiveCount { listing: Listing, count: usize },

    #[error("malformed {listing} record: {reason}")]
    MalformedRecord { listing: Listing, reason: String },

    #[error("{listing} output is not valid UTF-8")]
    InvalidUtf8 { listing: Listing },
}

/// An add or rm target is invalid
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("path does not exist and is not tracked: {path}")]
    PathNotFound { path: String },

    #[error("path is outside the repository: {path}")]
    OutsideRepository { path: String },

    #[error("engine refused to stage changes: {message}")]
    Rejected { message: String },
}

/// Engine-level commit failure (an empty commit is not an error)
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error("engine refused to commit: {message}")]
    Rejected { message: String },

    #[error("commit not found: {rev}")]
    NotFound { rev: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("branch '{name}' does not exist")]
    BranchNotFound { name: String },

    #[error("'{name}' is not a valid branch name")]
    InvalidName { name: String },

    #[error("uncommitted changes conflict with checkout: {message}")]
    Conflict { message: String },

    #[error("cannot delete '{name}': it is the checked-out branch")]
    DeleteActive { name: String },

    #[error("engine refused branch operation: {message}")]
    Rejected { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("tag '{name}' already exists")]
    Exists { name: String },

    #[error("'{name}' is not a valid tag name")]
    InvalidName { name: String },

    #[error("tag '{name}' does not point at a commit")]
    NoCommit { name: String },

    #[error("engine refused tag operation: {message}")]
    Rejected { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("remote '{name}' already exists")]
    Exists { name: String },

    #[error("remote '{name}' does not exist")]
    NotFound { name: String },

    #[error("remote '{name}' is unreachable: {message}")]
    Unreachable { name: String, message: String },

    #[error("engine refused remote operation: {message}")]
    Rejected { message: String },
}

/// The engine process itself could not be driven
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' did not finish within {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    #[error("'{command}' exited with {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("i/o error while talking to the engine: {0}")]
    Io(#[from] std::io::Error),
}
