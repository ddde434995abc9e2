//! Process boundary to the git engine
//!
//! [`ProcessRunner`] is the single point of contact with the external engine.
//! Everything else in the crate builds argument lists and hands them to a
//! runner, which makes the engine swappable for a scripted fake in tests.

mod runner;

pub use runner::{GitCli, ProcessOutput, ProcessRunner, RunnerConfig};
