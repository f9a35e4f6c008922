//! `ssh`/`scp` implementation of the `RemoteShell` port.
//!
//! Platform containers are recreated constantly and reuse addresses, so host
//! keys are neither checked nor recorded.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, RemoteShell};
use crate::domain::RuntimeConfig;
use crate::infra::command_runner::TokioCommandRunner;

const SSH_OPTIONS: [&str; 6] = [
    "-o",
    "StrictHostKeyChecking=no",
    "-o",
    "UserKnownHostsFile=/dev/null",
    "-o",
    "LogLevel=ERROR",
];

/// Remote shell adapter for the OpenSSH client binaries.
#[derive(Debug, Clone)]
pub struct SshCli<R> {
    runner: R,
    ssh: String,
    scp: String,
}

impl<R: CommandRunner> SshCli<R> {
    pub fn new(runner: R, ssh: impl Into<String>, scp: impl Into<String>) -> Self {
        Self {
            runner,
            ssh: ssh.into(),
            scp: scp.into(),
        }
    }

    pub fn with_runner(runner: R, config: &RuntimeConfig) -> Self {
        Self::new(runner, config.ssh.clone(), config.scp.clone())
    }
}

impl SshCli<TokioCommandRunner> {
    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::with_runner(TokioCommandRunner::new(config.command_timeout()), config)
    }
}

impl<R: CommandRunner> RemoteShell for SshCli<R> {
    async fn run(&self, ip: &str, user: &str, command: &str) -> Result<Output> {
        let destination = format!("{user}@{ip}");
        let mut args: Vec<&str> = SSH_OPTIONS.to_vec();
        args.extend([destination.as_str(), command]);
        self.runner
            .run(&self.ssh, &args)
            .await
            .with_context(|| format!("{} {destination}", self.ssh))
    }

    async fn copy_to(&self, source: &Path, ip: &str, user: &str, dest: &str) -> Result<Output> {
        let source = source.to_string_lossy();
        let remote = format!("{user}@{ip}:{dest}");
        let mut args: Vec<&str> = SSH_OPTIONS.to_vec();
        args.extend(["-r", &*source, remote.as_str()]);
        self.runner
            .run(&self.scp, &args)
            .await
            .with_context(|| format!("{} to {remote}", self.scp))
    }

    async fn copy_from(&self, ip: &str, user: &str, source: &str, dest: &Path) -> Result<Output> {
        let remote = format!("{user}@{ip}:{source}");
        let dest = dest.to_string_lossy();
        let mut args: Vec<&str> = SSH_OPTIONS.to_vec();
        args.extend(["-r", remote.as_str(), &*dest]);
        self.runner
            .run(&self.scp, &args)
            .await
            .with_context(|| format!("{} from {remote}", self.scp))
    }
}
