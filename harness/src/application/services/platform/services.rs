//! Service start-up inside the platform containers.

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{info, warn};

use super::PlatformManager;
use crate::application::ports::{ContainerRuntime, RemoteShell};
use crate::application::services::container_ops;
use crate::domain::PlatformError;
use crate::domain::listing::shell_quote;

fn service_start(service: &str) -> String {
    format!("service {} start", shell_quote(service))
}

impl<D: ContainerRuntime, S: RemoteShell> PlatformManager<D, S> {
    async fn start_on(&self, service: &str, host: &str) -> Result<()> {
        let container = self.layout.container(host)?;
        info!(host, service, "starting service");
        if !container_ops::exec_status(&self.runtime, container, &service_start(service), None).await {
            warn!(host, service, "service start failed");
        }
        Ok(())
    }

    async fn wait_all(&self, wait: &[&str]) -> Result<()> {
        for process in wait {
            self.wait_process(process, true).await?;
        }
        Ok(())
    }

    /// Start each of `services` on every host, then wait for each process
    /// in `wait` to run on every host.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::ProcessNotRunning`] if a waited process does
    /// not show up in time.
    pub async fn start_services(&self, services: &[&str], wait: &[&str]) -> Result<()> {
        for service in services {
            for host in self.layout.hosts() {
                self.start_on(service, host).await?;
            }
        }
        self.wait_all(wait).await
    }

    /// Start, per host, the listed services.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownHost`] before starting anything if a
    /// key is not a platform host, or a readiness error as in
    /// [`start_services`](Self::start_services).
    pub async fn start_services_on_hosts(
        &self,
        services: &BTreeMap<String, Vec<String>>,
        wait: &[&str],
    ) -> Result<()> {
        if let Some(host) = services.keys().find(|h| !self.layout.contains_host(h)) {
            return Err(PlatformError::UnknownHost(host.clone()).into());
        }
        for (host, names) in services {
            for service in names {
                self.start_on(service, host).await?;
            }
        }
        self.wait_all(wait).await
    }

    /// Start one service on each of `hosts`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownHost`] before starting anything if a
    /// host is not part of the platform, or a readiness error.
    pub async fn start_service_across(&self, service: &str, hosts: &[&str], wait: &[&str]) -> Result<()> {
        if let Some(host) = hosts.iter().find(|h| !self.layout.contains_host(h)) {
            return Err(PlatformError::UnknownHost((*host).to_string()).into());
        }
        for host in hosts {
            self.start_on(service, host).await?;
        }
        self.wait_all(wait).await
    }
}
