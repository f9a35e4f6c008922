//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! docker and ssh command lines, configuration loading, and log setup.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.

pub mod command_runner;
pub mod config;
pub mod docker;
pub mod logging;
pub mod ssh;

pub use command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
pub use config::YamlConfigStore;
pub use docker::DockerCli;
pub use ssh::SshCli;
