//! Platform orchestration: a named set of hosts backed by containers.
//!
//! [`PlatformManager`] is a handle over runtime state it does not own.
//! Images, containers and network membership are re-queried on every
//! observation, so the manager never disagrees with what the runtime reports
//! even when something outside it changes that state.
//!
//! Operations run sequentially, one host at a time, in host key order.

mod lifecycle;
mod network;
mod services;
mod shell;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::application::ports::{ContainerRuntime, RemoteShell};
use crate::domain::{PlatformLayout, ResetPolicy};

/// A setup or teardown action recorded against a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformStep {
    Reset(ResetPolicy),
    BuildImages,
    SetupNetwork,
    RunContainers,
    ConnectNetwork,
    TeardownNetwork,
    StandardSetup,
    /// Status-only command on every host.
    Exec(String),
    /// Start services on every host.
    StartServices(Vec<String>),
    /// Wait for a process on every host, failing on timeout.
    WaitProcess(String),
}

/// Orchestrates one platform through a container runtime and a remote shell.
pub struct PlatformManager<D, S> {
    layout: PlatformLayout,
    runtime: D,
    shell: S,
    teardown: Vec<PlatformStep>,
}

impl<D, S> PlatformManager<D, S> {
    #[must_use]
    pub fn new(layout: PlatformLayout, runtime: D, shell: S) -> Self {
        Self {
            layout,
            runtime,
            shell,
            teardown: Vec::new(),
        }
    }

    #[must_use]
    pub fn layout(&self) -> &PlatformLayout {
        &self.layout
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.layout.name()
    }

    #[must_use]
    pub fn runtime(&self) -> &D {
        &self.runtime
    }

    #[must_use]
    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Record steps that [`scope`](Self::scope) runs when the scope exits.
    #[must_use]
    pub fn post_teardown(mut self, steps: impl IntoIterator<Item = PlatformStep>) -> Self {
        self.teardown.extend(steps);
        self
    }

    #[must_use]
    pub fn teardown_steps(&self) -> &[PlatformStep] {
        &self.teardown
    }
}

impl<D: ContainerRuntime, S: RemoteShell> PlatformManager<D, S> {
    /// Run `steps` now, in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub async fn pre_setup(&self, steps: &[PlatformStep]) -> Result<()> {
        for step in steps {
            self.run_step(step)
                .await
                .with_context(|| format!("setup step {step:?}"))?;
        }
        Ok(())
    }

    /// Run `body`, then the recorded teardown steps whatever the outcome.
    ///
    /// Every teardown step is attempted even if an earlier one fails. When
    /// `body` fails, its error is returned and teardown failures are only
    /// logged; when `body` succeeds, the first teardown failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the body's error, or the first teardown error.
    pub async fn scope<T>(&self, body: impl AsyncFnOnce(&Self) -> Result<T>) -> Result<T> {
        let outcome = body(self).await;
        let teardown = self.run_teardown().await;
        match (outcome, teardown) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.context("platform teardown")),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(t)) => {
                warn!(platform = self.name(), error = %t, "teardown failed after scope error");
                Err(e)
            }
        }
    }

    async fn run_teardown(&self) -> Result<()> {
        let mut first_error = None;
        for step in &self.teardown {
            if let Err(e) = self.run_step(step).await {
                warn!(platform = self.name(), ?step, error = %e, "teardown step failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Execute a single recorded step.
    ///
    /// # Errors
    ///
    /// Returns the underlying operation's error.
    pub async fn run_step(&self, step: &PlatformStep) -> Result<()> {
        match step {
            PlatformStep::Reset(policy) => self.reset(*policy).await,
            PlatformStep::BuildImages => self.build_images(ResetPolicy::None).await,
            PlatformStep::SetupNetwork => self.setup_network().await,
            PlatformStep::RunContainers => self.run_containers(ResetPolicy::None).await,
            PlatformStep::ConnectNetwork => self.connect_network().await,
            PlatformStep::TeardownNetwork => self.teardown_network().await,
            PlatformStep::StandardSetup => self.standard_setup().await,
            PlatformStep::Exec(command) => {
                if !self.docker_exec_status(command, None).await?.all() {
                    warn!(platform = self.name(), command = %command, "command failed on some hosts");
                }
                Ok(())
            }
            PlatformStep::StartServices(services) => {
                let services: Vec<&str> = services.iter().map(String::as_str).collect();
                self.start_services(&services, &[]).await
            }
            PlatformStep::WaitProcess(process) => self.wait_process(process, true).await.map(drop),
        }
    }

    /// Idempotent bring-up: build missing images, ensure the network,
    /// recreate the containers, and attach them all to the network.
    ///
    /// # Errors
    ///
    /// Returns an error if a build fails or the runtime cannot be queried.
    pub async fn standard_setup(&self) -> Result<()> {
        info!(platform = self.name(), "standard setup");
        self.build_images(ResetPolicy::None).await?;
        self.setup_network().await?;
        self.run_containers(ResetPolicy::RmContainer).await?;
        self.connect_network().await
    }
}
