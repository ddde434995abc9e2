use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gm")]
#[command(about = "Inspect and drive a git working tree")]
pub struct Cli {
    /// Path of the working tree
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Git executable to drive
    #[arg(long, global = true, env = "GITMODEL_GIT", default_value = "git")]
    pub git: PathBuf,

    /// Kill any git invocation running longer than this many seconds
    #[arg(long, global = true, env = "GITMODEL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Print JSON instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a repository, creating the directory if needed
    Init {
        /// Create a bare repository
        #[arg(long)]
        bare: bool,
        /// Branch HEAD points to before the first commit
        #[arg(long)]
        initial_branch: Option<String>,
    },
    /// Clone a repository unless one already exists at the path
    Clone {
        /// URL or path of the repository to clone
        url: String,
    },
    /// Show working tree changes
    Status {},
    /// Stage files or directories
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove files or directories and stage the removal
    Rm {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Commit staged changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
        /// Stage modifications and deletions of tracked files first
        #[arg(short, long)]
        all: bool,
    },
    /// Switch branches
    Checkout {
        branch: String,
        /// Create the branch when it does not exist
        #[arg(short = 'b')]
        create: bool,
    },
    /// Branch operations (interactive switch when no flags are given)
    Branch {
        /// List branches with their tip and upstream
        #[arg(short, long)]
        list: bool,
        /// Delete the named branch
        #[arg(short, long, value_name = "NAME")]
        delete: Option<String>,
        /// Delete even when not fully merged
        #[arg(short, long, requires = "delete")]
        force: bool,
    },
    /// Show commit history of a branch (default: the active one)
    Log {
        branch: Option<String>,
        /// Limit the number of commits
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },
    /// Tag operations
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Remote operations
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// List tags, optionally only those reachable from a branch
    List {
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Tag HEAD, or the tip of a branch
    Add {
        name: String,
        /// Create an annotated tag with this message
        #[arg(short, long)]
        message: Option<String>,
        #[arg(short, long)]
        branch: Option<String>,
    },
    /// Delete a tag
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum RemoteCommands {
    /// List remotes with their URLs
    List,
    /// Add a remote
    Add { name: String, url: String },
    /// Remove a remote
    Remove { name: String },
    /// List remote-tracking branches of a remote
    Branches { name: String },
    /// Fetch from a remote
    Fetch { name: String },
    /// Push a branch (default: the active one) to a remote
    Push {
        remote: String,
        branch: Option<String>,
        /// Make the pushed branch the upstream
        #[arg(short = 'u', long)]
        set_upstream: bool,
    },
}
