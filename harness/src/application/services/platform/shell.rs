//! Fan-out helpers: one host when a key is given, every host otherwise.
//!
//! Data-returning operations yield a [`HostOutput`]; operations without a
//! result visit the same targets and stop at the first failing host.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use super::PlatformManager;
use crate::application::ports::{ContainerRuntime, RemoteShell};
use crate::application::services::HostOutput;
use crate::application::services::container_ops::{self, WriteOptions};
use crate::domain::PlatformError;
use crate::domain::listing::shell_quote;

impl<D: ContainerRuntime, S: RemoteShell> PlatformManager<D, S> {
    fn targets<'a>(&'a self, host: Option<&'a str>) -> Result<Vec<(&'a str, &'a str)>, PlatformError> {
        match host {
            Some(host) => Ok(vec![(host, self.layout.container(host)?)]),
            None => Ok(self
                .layout
                .containers()
                .iter()
                .map(|(host, container)| (host.as_str(), container.as_str()))
                .collect()),
        }
    }

    async fn fan_out<T>(
        &self,
        host: Option<&str>,
        mut op: impl AsyncFnMut(&str, &str) -> Result<T>,
    ) -> Result<HostOutput<T>> {
        if let Some(host) = host {
            let container = self.layout.container(host)?;
            return Ok(HostOutput::Single(op(host, container).await?));
        }
        let mut results = BTreeMap::new();
        for (host, container) in self.layout.containers() {
            results.insert(host.clone(), op(host, container).await?);
        }
        Ok(HostOutput::PerHost(results))
    }

    async fn reachable_ip(&self, host: &str, container: &str) -> Result<String> {
        let ip = container_ops::container_ip(&self.runtime, container).await?;
        if ip.is_empty() {
            return Err(PlatformError::Command {
                command: "inspect".to_string(),
                target: host.to_string(),
                detail: format!("container {container} is not running"),
            }
            .into());
        }
        Ok(ip)
    }

    async fn remote_run(&self, host: &str, container: &str, command: &str) -> Result<String> {
        let ip = self.reachable_ip(host, container).await?;
        let output = self
            .shell
            .run(&ip, self.layout.user(), command)
            .await
            .with_context(|| format!("ssh to {host} ({ip})"))?;
        if !output.status.success() {
            return Err(
                PlatformError::command(command, host, output.status.code(), &output.stderr).into(),
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    // ── Remote shell ─────────────────────────────────────────────────────────

    /// Run `command` over ssh as the platform user.
    ///
    /// Requires an ssh daemon and an authorized key in the target image.
    ///
    /// # Errors
    ///
    /// Returns an error if a container is not running or the command fails.
    pub async fn ssh(&self, command: &str, host: Option<&str>) -> Result<HostOutput<String>> {
        self.fan_out(host, async |host: &str, container: &str| {
            self.remote_run(host, container, command).await
        })
        .await
    }

    /// Copy a local file to `dest` over scp as the platform user.
    ///
    /// # Errors
    ///
    /// Returns an error if a container is not running or the copy fails.
    pub async fn scp(&self, source: &Path, dest: &str, host: Option<&str>) -> Result<()> {
        for (host, container) in self.targets(host)? {
            let ip = self.reachable_ip(host, container).await?;
            let output = self
                .shell
                .copy_to(source, &ip, self.layout.user(), dest)
                .await
                .with_context(|| format!("scp to {host} ({ip})"))?;
            if !output.status.success() {
                let command = format!("scp {} {dest}", source.display());
                return Err(
                    PlatformError::command(&command, host, output.status.code(), &output.stderr)
                        .into(),
                );
            }
        }
        Ok(())
    }

    /// Write `data` followed by a newline to `dest` over ssh.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote write fails.
    pub async fn ssh_put_data(
        &self,
        data: &str,
        dest: &str,
        host: Option<&str>,
        append: bool,
    ) -> Result<()> {
        let redirect = if append { ">>" } else { ">" };
        let command = format!("printf '%s\\n' {} {redirect} {}", shell_quote(data), shell_quote(dest));
        for (host, container) in self.targets(host)? {
            self.remote_run(host, container, &command).await?;
        }
        Ok(())
    }

    /// Contents of `source`, read over ssh.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote read fails.
    pub async fn ssh_get_data(&self, source: &str, host: Option<&str>) -> Result<HostOutput<String>> {
        self.ssh(&format!("cat {}", shell_quote(source)), host).await
    }

    // ── Container shell ──────────────────────────────────────────────────────

    /// Stdout of `command` run inside the container, whatever its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown host or if the runtime cannot be invoked.
    pub async fn docker_exec(&self, command: &str, host: Option<&str>) -> Result<HostOutput<String>> {
        self.fan_out(host, async |_: &str, container: &str| {
            container_ops::exec_output(&self.runtime, container, command, None).await
        })
        .await
    }

    /// Whether `command` exits successfully inside the container.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown host.
    pub async fn docker_exec_status(&self, command: &str, host: Option<&str>) -> Result<HostOutput<bool>> {
        self.fan_out(host, async |_: &str, container: &str| {
            Ok(container_ops::exec_status(&self.runtime, container, command, None).await)
        })
        .await
    }

    /// `ps ax` listing of the container.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown host or if the runtime cannot be invoked.
    pub async fn get_processes(&self, host: Option<&str>) -> Result<HostOutput<String>> {
        self.docker_exec("ps ax", host).await
    }

    /// Create `user` with a home directory and a group of the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if `useradd` fails.
    pub async fn create_user(&self, user: &str, host: Option<&str>) -> Result<()> {
        let command = format!("useradd -m -U {}", shell_quote(user));
        for (_, container) in self.targets(host)? {
            container_ops::exec_checked(&self.runtime, container, &command, Some("root")).await?;
        }
        Ok(())
    }

    /// Write `data` to `dest` inside the container.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or the owner/mode change fails.
    pub async fn put_data(
        &self,
        data: &[u8],
        dest: &str,
        host: Option<&str>,
        opts: WriteOptions<'_>,
    ) -> Result<()> {
        for (_, container) in self.targets(host)? {
            container_ops::put_data(&self.runtime, data, dest, container, opts).await?;
        }
        Ok(())
    }

    /// Copy a local file into the container at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy or the owner/mode change fails.
    pub async fn put_file(
        &self,
        source: &Path,
        dest: &str,
        host: Option<&str>,
        opts: WriteOptions<'_>,
    ) -> Result<()> {
        for (_, container) in self.targets(host)? {
            container_ops::put_file(&self.runtime, source, dest, container, opts).await?;
        }
        Ok(())
    }

    /// Contents of `source` inside the container.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn get_data(&self, source: &str, host: Option<&str>) -> Result<HostOutput<String>> {
        self.fan_out(host, async |_: &str, container: &str| {
            container_ops::get_data(&self.runtime, source, container).await
        })
        .await
    }

    /// Copy `source` out of `host`'s container to a local path.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown host or if the copy fails.
    pub async fn get_file(&self, source: &str, dest: &Path, host: &str) -> Result<()> {
        let container = self.layout.container(host)?;
        container_ops::get_file(&self.runtime, container, source, dest).await
    }

    /// Per host, whether `path` meets the expectation: present, or with
    /// `negate` absent. Every addressed host is checked and each one breaking
    /// the expectation is logged; [`HostOutput::all`] gives the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown host.
    pub async fn path_exists(&self, path: &str, host: Option<&str>, negate: bool) -> Result<HostOutput<bool>> {
        self.fan_out(host, async |host: &str, container: &str| {
            let exists = container_ops::path_exists(&self.runtime, path, container).await;
            if exists == negate {
                if negate {
                    warn!(host, path, "path found");
                } else {
                    warn!(host, path, "path not found");
                }
            }
            Ok(exists != negate)
        })
        .await
    }

    /// Installed version of package `app`, `None` where it is not installed.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown host or if the runtime cannot be invoked.
    pub async fn get_version(&self, app: &str, host: Option<&str>) -> Result<HostOutput<Option<String>>> {
        self.fan_out(host, async |_: &str, container: &str| {
            container_ops::get_version(&self.runtime, app, container).await
        })
        .await
    }

    /// # Errors
    ///
    /// Returns an error if `chown` fails.
    pub async fn set_owner(&self, path: &str, owner: &str, host: Option<&str>) -> Result<()> {
        for (_, container) in self.targets(host)? {
            container_ops::set_owner(&self.runtime, path, owner, container).await?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `chmod` fails.
    pub async fn set_permissions(&self, path: &str, mode: &str, host: Option<&str>) -> Result<()> {
        for (_, container) in self.targets(host)? {
            container_ops::set_permissions(&self.runtime, path, mode, container).await?;
        }
        Ok(())
    }

    /// Host key whose container is `container`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownContainer`] if no host maps to it.
    pub fn host_from_container(&self, container: &str) -> Result<&str, PlatformError> {
        self.layout.host_from_container(container)
    }
}
