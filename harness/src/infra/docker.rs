//! Docker CLI implementation of the container runtime port traits.
//!
//! `DockerCli<R>` routes every runtime call through a `CommandRunner`, so
//! tests can inject a recording runner without spawning real processes. Any
//! docker-compatible binary (for instance `podman`) can be configured.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, ContainerLifecycle, ContainerShell, ImageStore, NetworkControl, RunSpec,
};
use crate::domain::RuntimeConfig;
use crate::infra::command_runner::TokioCommandRunner;

/// Container runtime adapter for the `docker` command line.
#[derive(Debug, Clone)]
pub struct DockerCli<R> {
    runner: R,
    binary: String,
    images_dir: PathBuf,
    build_timeout: Duration,
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn new(runner: R, binary: impl Into<String>, images_dir: impl Into<PathBuf>, build_timeout: Duration) -> Self {
        Self {
            runner,
            binary: binary.into(),
            images_dir: images_dir.into(),
            build_timeout,
        }
    }

    pub fn with_runner(runner: R, config: &RuntimeConfig) -> Self {
        Self::new(
            runner,
            config.docker.clone(),
            config.images_dir.clone(),
            config.build_timeout(),
        )
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    async fn docker(&self, args: &[&str]) -> Result<Output> {
        let what = args.first().copied().unwrap_or_default();
        self.runner
            .run(&self.binary, args)
            .await
            .with_context(|| format!("{} {what}", self.binary))
    }
}

impl DockerCli<TokioCommandRunner> {
    /// Production adapter built from the runtime settings.
    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::with_runner(TokioCommandRunner::new(config.command_timeout()), config)
    }
}

impl<R: CommandRunner> ImageStore for DockerCli<R> {
    async fn list_images(&self) -> Result<Output> {
        self.docker(&["images", "--format", "{{.Repository}}"]).await
    }

    async fn build_image(&self, image: &str) -> Result<Output> {
        let dockerfile = self.images_dir.join(image).join("Dockerfile");
        let dockerfile = dockerfile.to_string_lossy();
        let context = self.images_dir.to_string_lossy();
        self.runner
            .run_with_timeout(
                &self.binary,
                &["build", "-f", &dockerfile, "-t", image, &context],
                self.build_timeout,
            )
            .await
            .with_context(|| format!("{} build {image}", self.binary))
    }

    async fn remove_image(&self, image: &str) -> Result<Output> {
        self.docker(&["rmi", image]).await
    }

    async fn commit(&self, container: &str, image: &str) -> Result<Output> {
        self.docker(&["commit", container, image]).await
    }
}

impl<R: CommandRunner> ContainerLifecycle for DockerCli<R> {
    async fn list_containers(&self, all: bool) -> Result<Output> {
        let mut args = vec!["ps"];
        if all {
            args.push("-a");
        }
        args.extend(["--format", "{{.Names}}"]);
        self.docker(&args).await
    }

    async fn list_containers_with_images(&self, all: bool) -> Result<Output> {
        let mut args = vec!["ps"];
        if all {
            args.push("-a");
        }
        args.extend(["--format", "{{.Names}}\t{{.Image}}"]);
        self.docker(&args).await
    }

    async fn run_container(&self, spec: &RunSpec<'_>) -> Result<Output> {
        let mut args = vec!["run", "-d", "--name", spec.name, "-h", spec.hostname];
        args.extend(spec.parameters.iter().map(String::as_str));
        args.push(spec.image);
        self.docker(&args).await
    }

    async fn start_container(&self, container: &str) -> Result<Output> {
        self.docker(&["start", container]).await
    }

    async fn stop_container(&self, container: &str) -> Result<Output> {
        self.docker(&["stop", container]).await
    }

    async fn remove_container(&self, container: &str) -> Result<Output> {
        self.docker(&["rm", container]).await
    }

    async fn inspect(&self, container: &str) -> Result<Output> {
        self.docker(&["inspect", "--type", "container", container]).await
    }
}

impl<R: CommandRunner> NetworkControl for DockerCli<R> {
    async fn list_networks(&self) -> Result<Output> {
        self.docker(&["network", "ls", "--format", "{{.Name}}"]).await
    }

    async fn create_network(&self, network: &str) -> Result<Output> {
        self.docker(&["network", "create", network]).await
    }

    async fn remove_network(&self, network: &str) -> Result<Output> {
        self.docker(&["network", "rm", network]).await
    }

    async fn connect_network(&self, network: &str, container: &str) -> Result<Output> {
        self.docker(&["network", "connect", network, container]).await
    }
}

impl<R: CommandRunner> ContainerShell for DockerCli<R> {
    async fn exec(&self, container: &str, user: Option<&str>, command: &str) -> Result<Output> {
        let mut args = vec!["exec", "-i"];
        if let Some(user) = user {
            args.extend(["-u", user]);
        }
        args.extend([container, "sh", "-c", command]);
        self.docker(&args).await
    }

    async fn exec_with_stdin(&self, container: &str, command: &str, input: &[u8]) -> Result<Output> {
        self.runner
            .run_with_stdin(&self.binary, &["exec", "-i", container, "sh", "-c", command], input)
            .await
            .with_context(|| format!("{} exec {container}", self.binary))
    }

    async fn copy_in(&self, source: &Path, container: &str, dest: &str) -> Result<Output> {
        let source = source.to_string_lossy();
        let dest = format!("{container}:{dest}");
        self.docker(&["cp", &source, &dest]).await
    }

    async fn copy_out(&self, container: &str, source: &str, dest: &Path) -> Result<Output> {
        let source = format!("{container}:{source}");
        let dest = dest.to_string_lossy();
        self.docker(&["cp", &source, &dest]).await
    }
}
