pub mod repo_extensions;
pub mod scripted_runner;

pub use repo_extensions::{
    create_test_bare_repo, create_test_repo, RepoAssertions, RepoTestOperations,
};
pub use scripted_runner::ScriptedRunner;
