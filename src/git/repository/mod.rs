pub mod config;
pub mod core;
mod path;

pub use self::config::Identity;
pub use self::core::{GitRepo, RepoOptions, RepoState};
