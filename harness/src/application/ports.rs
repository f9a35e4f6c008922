//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and never from `crate::infra`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{HarnessConfig, PlatformTarget};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Parameters for creating and starting a container.
pub struct RunSpec<'a> {
    pub image: &'a str,
    /// Container name.
    pub name: &'a str,
    /// Hostname inside the container; the manager passes the container name.
    pub hostname: &'a str,
    /// Extra `run` tokens, placed before the image.
    pub parameters: &'a [String],
}

// ── Container Runtime Port Traits ────────────────────────────────────────────

/// Image operations.
#[allow(async_fn_in_trait)]
pub trait ImageStore {
    /// List image names, one per line.
    async fn list_images(&self) -> Result<Output>;
    /// Build `image` from its build context, tagged with its own name.
    async fn build_image(&self, image: &str) -> Result<Output>;
    /// Remove `image`.
    async fn remove_image(&self, image: &str) -> Result<Output>;
    /// Snapshot `container` into `image`.
    async fn commit(&self, container: &str, image: &str) -> Result<Output>;
}

/// Container lifecycle and inspection.
#[allow(async_fn_in_trait)]
pub trait ContainerLifecycle {
    /// List container names, one per line; stopped ones only when `all`.
    async fn list_containers(&self, all: bool) -> Result<Output>;
    /// List containers as `name<TAB>image` lines, the image as the runtime
    /// reports it; stopped ones only when `all`.
    async fn list_containers_with_images(&self, all: bool) -> Result<Output>;
    /// Create and start a detached container.
    async fn run_container(&self, spec: &RunSpec<'_>) -> Result<Output>;
    async fn start_container(&self, container: &str) -> Result<Output>;
    async fn stop_container(&self, container: &str) -> Result<Output>;
    async fn remove_container(&self, container: &str) -> Result<Output>;
    /// Inspect `container`, printing JSON.
    async fn inspect(&self, container: &str) -> Result<Output>;
}

/// Network operations.
#[allow(async_fn_in_trait)]
pub trait NetworkControl {
    /// List network names, one per line.
    async fn list_networks(&self) -> Result<Output>;
    async fn create_network(&self, network: &str) -> Result<Output>;
    async fn remove_network(&self, network: &str) -> Result<Output>;
    async fn connect_network(&self, network: &str, container: &str) -> Result<Output>;
}

/// Command execution and file copies inside a container.
#[allow(async_fn_in_trait)]
pub trait ContainerShell {
    /// Run a shell command line inside `container`, optionally as `user`.
    async fn exec(&self, container: &str, user: Option<&str>, command: &str) -> Result<Output>;
    /// Run a shell command line inside `container` with stdin piped from `input`.
    async fn exec_with_stdin(&self, container: &str, command: &str, input: &[u8])
    -> Result<Output>;
    /// Copy a local file or directory into `container` at `dest`.
    async fn copy_in(&self, source: &Path, container: &str, dest: &str) -> Result<Output>;
    /// Copy `source` out of `container` to a local path.
    async fn copy_out(&self, container: &str, source: &str, dest: &Path) -> Result<Output>;
}

/// Composite trait: the whole container runtime client.
pub trait ContainerRuntime: ImageStore + ContainerLifecycle + NetworkControl + ContainerShell {}

/// Blanket implementation: any type implementing all four sub-traits is a `ContainerRuntime`.
impl<T> ContainerRuntime for T where T: ImageStore + ContainerLifecycle + NetworkControl + ContainerShell
{}

// ── Remote Execution Port ─────────────────────────────────────────────────────

/// Remote shell and copy against a host reachable by IP.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    async fn run(&self, ip: &str, user: &str, command: &str) -> Result<Output>;
    async fn copy_to(&self, source: &Path, ip: &str, user: &str, dest: &str) -> Result<Output>;
    async fn copy_from(&self, ip: &str, user: &str, source: &str, dest: &Path) -> Result<Output>;
}

// ── Provisioning Port ─────────────────────────────────────────────────────────

/// Software deployment onto a running platform.
#[allow(async_fn_in_trait)]
pub trait Provisioner {
    /// Target subsequent deployments at `platform`.
    fn register_platform(&mut self, platform: PlatformTarget);
    /// Select the distribution to deploy.
    fn set_platform(&mut self, distribution: &str);
    /// Deploy onto the registered platform from a clean slate.
    async fn deploy_from_scratch(&mut self, force: bool) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the harness configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if none exists.
    fn load(&self) -> Result<HarnessConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> std::path::PathBuf;
}
