//! Shared in-memory doubles for unit tests.
//!
//! [`FakeRuntime`] keeps images, containers, networks and container files in
//! memory and answers the handful of shell commands the harness issues.
//! Clones share state, so a test can keep a handle for assertions while the
//! manager owns another.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use platform_harness::application::ports::{
    CommandRunner, ContainerLifecycle, ContainerShell, ImageStore, NetworkControl, Provisioner,
    RemoteShell, RunSpec,
};
use platform_harness::application::services::PlatformManager;
use platform_harness::domain::{PlatformLayout, PlatformTarget};

// ── Output helpers ────────────────────────────────────────────────────────────

pub fn ok_output(stdout: impl AsRef<[u8]>) -> Output {
    Output {
        status: ExitStatus::from_raw(0),
        stdout: stdout.as_ref().to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Split a command line into words, honoring single quotes and backslashes.
fn shell_words(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = command.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                quoted = !quoted;
                in_word = true;
            }
            '\\' if !quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

// ── Fake container runtime ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct FakeContainer {
    pub image: String,
    pub running: bool,
    pub ip: String,
    pub hostname: String,
    pub parameters: Vec<String>,
    pub networks: BTreeSet<String>,
    pub files: BTreeMap<String, Vec<u8>>,
    pub processes: Vec<String>,
    pub users: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct State {
    /// image → files baked into it
    images: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    containers: BTreeMap<String, FakeContainer>,
    networks: BTreeSet<String>,
    unbuildable: BTreeSet<String>,
    packages: BTreeMap<String, String>,
    boot_processes: Vec<String>,
    broken_services: BTreeSet<String>,
    fail_commits: bool,
    next_ip: u32,
    /// Mutating runtime calls, e.g. `run c1`, `stop c1`, `build img`.
    log: Vec<String>,
    /// `(container, command)` for every exec.
    execs: Vec<(String, String)>,
}

/// In-memory container runtime.
#[derive(Debug, Clone, Default)]
pub struct FakeRuntime {
    state: Rc<RefCell<State>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Scenario setup ──

    pub fn add_image(&self, image: &str) {
        self.state
            .borrow_mut()
            .images
            .entry(image.to_string())
            .or_default();
    }

    pub fn refuse_build(&self, image: &str) {
        self.state.borrow_mut().unbuildable.insert(image.to_string());
    }

    pub fn install_package(&self, app: &str, version: &str) {
        self.state
            .borrow_mut()
            .packages
            .insert(app.to_string(), version.to_string());
    }

    /// Process listed by `ps ax` in every container once it starts.
    pub fn boot_process(&self, process: &str) {
        self.state.borrow_mut().boot_processes.push(process.to_string());
    }

    pub fn break_service(&self, service: &str) {
        self.state
            .borrow_mut()
            .broken_services
            .insert(service.to_string());
    }

    pub fn fail_commits(&self) {
        self.state.borrow_mut().fail_commits = true;
    }

    /// A container the platform does not own, created from `image`.
    pub fn add_foreign_container(&self, name: &str, image: &str, running: bool) {
        let mut state = self.state.borrow_mut();
        state.images.entry(image.to_string()).or_default();
        let ip = if running { Self::allocate_ip(&mut state) } else { String::new() };
        state.containers.insert(
            name.to_string(),
            FakeContainer {
                image: image.to_string(),
                running,
                ip,
                hostname: name.to_string(),
                ..FakeContainer::default()
            },
        );
    }

    pub fn write_file(&self, container: &str, path: &str, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let c = state.containers.get_mut(container).expect("container exists");
        c.files.insert(path.to_string(), data.to_vec());
    }

    /// Stop a container behind the manager's back.
    pub fn kill(&self, container: &str) {
        let mut state = self.state.borrow_mut();
        let c = state.containers.get_mut(container).expect("container exists");
        c.running = false;
        c.ip.clear();
        c.processes.clear();
    }

    // ── Observations ──

    pub fn images(&self) -> BTreeSet<String> {
        self.state.borrow().images.keys().cloned().collect()
    }

    pub fn containers(&self, all: bool) -> BTreeSet<String> {
        self.state
            .borrow()
            .containers
            .iter()
            .filter(|(_, c)| all || c.running)
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn container(&self, name: &str) -> Option<FakeContainer> {
        self.state.borrow().containers.get(name).cloned()
    }

    pub fn networks(&self) -> BTreeSet<String> {
        self.state.borrow().networks.clone()
    }

    pub fn file(&self, container: &str, path: &str) -> Option<Vec<u8>> {
        self.state
            .borrow()
            .containers
            .get(container)
            .and_then(|c| c.files.get(path).cloned())
    }

    pub fn log(&self) -> Vec<String> {
        self.state.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    pub fn execs(&self) -> Vec<(String, String)> {
        self.state.borrow().execs.clone()
    }

    fn container_by_ip(&self, ip: &str) -> Option<String> {
        self.state
            .borrow()
            .containers
            .iter()
            .find(|(_, c)| c.running && c.ip == ip)
            .map(|(n, _)| n.clone())
    }

    fn allocate_ip(state: &mut State) -> String {
        state.next_ip += 1;
        format!("172.17.0.{}", state.next_ip + 1)
    }

    fn boot(state: &mut State, name: &str) {
        let ip = Self::allocate_ip(state);
        let processes = state.boot_processes.clone();
        if let Some(c) = state.containers.get_mut(name) {
            c.running = true;
            c.ip = ip;
            c.processes = processes;
        }
    }

    fn shell(&self, container: &str, user: Option<&str>, command: &str, stdin: Option<&[u8]>) -> Output {
        let mut state = self.state.borrow_mut();
        state.execs.push((container.to_string(), command.to_string()));
        let State {
            containers,
            packages,
            broken_services,
            ..
        } = &mut *state;
        let Some(c) = containers.get_mut(container) else {
            return err_output(1, &format!("Error: No such container: {container}"));
        };
        if !c.running {
            return err_output(1, &format!("Error: container {container} is not running"));
        }
        let words = shell_words(command);
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let missing = |path: &str| err_output(1, &format!("{}: {path}: No such file or directory", words[0]));
        match words.as_slice() {
            ["ps", "ax"] => {
                let mut listing = String::from("  PID TTY      STAT   TIME COMMAND\n");
                for (pid, process) in c.processes.iter().enumerate() {
                    listing.push_str(&format!("{:>5} ?        Ss     0:00 {process}\n", pid + 1));
                }
                ok_output(listing)
            }
            ["pwd"] => ok_output(if user.is_some_and(|u| u != "root") { "/home\n" } else { "/\n" }),
            ["true"] => ok_output(""),
            ["false"] => err_output(1, ""),
            ["test", "-e", path] => {
                if c.files.contains_key(*path) {
                    ok_output("")
                } else {
                    err_output(1, "")
                }
            }
            ["touch", path] => {
                c.files.entry((*path).to_string()).or_default();
                ok_output("")
            }
            ["cat", path] => match c.files.get(*path) {
                Some(data) => ok_output(data),
                None => missing(*path),
            },
            ["cat", redirect @ (">" | ">>"), path] => {
                let input = stdin.unwrap_or_default();
                let file = c.files.entry((*path).to_string()).or_default();
                if *redirect == ">" {
                    file.clear();
                }
                file.extend_from_slice(input);
                ok_output("")
            }
            ["printf", r"%s\n", data, redirect @ (">" | ">>"), path] => {
                let file = c.files.entry((*path).to_string()).or_default();
                if *redirect == ">" {
                    file.clear();
                }
                file.extend_from_slice(data.as_bytes());
                file.push(b'\n');
                ok_output("")
            }
            ["service", name, "start"] => {
                if broken_services.contains(*name) {
                    return err_output(1, &format!("{name}: unrecognized service"));
                }
                let process = format!("/usr/sbin/{name}");
                if !c.processes.contains(&process) {
                    c.processes.push(process);
                }
                ok_output("")
            }
            ["apt-cache", "policy", app] => match packages.get(*app) {
                Some(version) => ok_output(format!(
                    "{app}:\n  Installed: {version}\n  Candidate: {version}\n"
                )),
                None => ok_output(format!("{app}:\n  Installed: (none)\n  Candidate: 1.0\n")),
            },
            ["useradd", "-m", "-U", name] => {
                if c.users.insert((*name).to_string()) {
                    ok_output("")
                } else {
                    err_output(9, &format!("useradd: user '{name}' already exists"))
                }
            }
            ["groups", name] => {
                if c.users.contains(*name) {
                    ok_output(format!("{name} : {name}\n"))
                } else {
                    err_output(1, &format!("groups: '{name}': no such user"))
                }
            }
            ["chown" | "chmod", _, path] => {
                if c.files.contains_key(*path) {
                    ok_output("")
                } else {
                    missing(*path)
                }
            }
            _ => ok_output(""),
        }
    }
}

impl ImageStore for FakeRuntime {
    async fn list_images(&self) -> Result<Output> {
        let names: Vec<String> = self.images().into_iter().collect();
        Ok(ok_output(names.join("\n")))
    }

    async fn build_image(&self, image: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("build {image}"));
        if state.unbuildable.contains(image) {
            return Ok(err_output(1, &format!("unable to prepare context for {image}")));
        }
        state.images.entry(image.to_string()).or_default();
        Ok(ok_output(""))
    }

    async fn remove_image(&self, image: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("rmi {image}"));
        if let Some((name, _)) = state.containers.iter().find(|(_, c)| c.image == image) {
            let message = format!("conflict: unable to remove {image} (container {name} is using it)");
            return Ok(err_output(1, &message));
        }
        if state.images.remove(image).is_none() {
            return Ok(err_output(1, &format!("No such image: {image}")));
        }
        Ok(ok_output(""))
    }

    async fn commit(&self, container: &str, image: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("commit {container} {image}"));
        if state.fail_commits {
            return Ok(err_output(1, "commit failed"));
        }
        let Some(files) = state.containers.get(container).map(|c| c.files.clone()) else {
            return Ok(err_output(1, &format!("No such container: {container}")));
        };
        state.images.insert(image.to_string(), files);
        Ok(ok_output(""))
    }
}

impl ContainerLifecycle for FakeRuntime {
    async fn list_containers(&self, all: bool) -> Result<Output> {
        let names: Vec<String> = self.containers(all).into_iter().collect();
        Ok(ok_output(names.join("\n")))
    }

    async fn list_containers_with_images(&self, all: bool) -> Result<Output> {
        let state = self.state.borrow();
        let lines: Vec<String> = state
            .containers
            .iter()
            .filter(|(_, c)| all || c.running)
            .map(|(n, c)| format!("{n}\t{}", c.image))
            .collect();
        Ok(ok_output(lines.join("\n")))
    }

    async fn run_container(&self, spec: &RunSpec<'_>) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("run {}", spec.name));
        let Some(files) = state.images.get(spec.image).cloned() else {
            return Ok(err_output(125, &format!("Unable to find image '{}' locally", spec.image)));
        };
        if state.containers.contains_key(spec.name) {
            return Ok(err_output(125, &format!("Conflict. The container name \"/{}\" is already in use", spec.name)));
        }
        state.containers.insert(
            spec.name.to_string(),
            FakeContainer {
                image: spec.image.to_string(),
                hostname: spec.hostname.to_string(),
                parameters: spec.parameters.to_vec(),
                files,
                ..FakeContainer::default()
            },
        );
        Self::boot(&mut state, spec.name);
        Ok(ok_output(format!("{}\n", spec.name)))
    }

    async fn start_container(&self, container: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("start {container}"));
        match state.containers.get(container).map(|c| c.running) {
            None => Ok(err_output(1, &format!("No such container: {container}"))),
            Some(true) => Ok(ok_output("")),
            Some(false) => {
                Self::boot(&mut state, container);
                Ok(ok_output(""))
            }
        }
    }

    async fn stop_container(&self, container: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("stop {container}"));
        let Some(c) = state.containers.get_mut(container) else {
            return Ok(err_output(1, &format!("No such container: {container}")));
        };
        c.running = false;
        c.ip.clear();
        c.processes.clear();
        Ok(ok_output(""))
    }

    async fn remove_container(&self, container: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("rm {container}"));
        match state.containers.get(container).map(|c| c.running) {
            None => Ok(err_output(1, &format!("No such container: {container}"))),
            Some(true) => Ok(err_output(1, "You cannot remove a running container")),
            Some(false) => {
                state.containers.remove(container);
                Ok(ok_output(""))
            }
        }
    }

    async fn inspect(&self, container: &str) -> Result<Output> {
        let state = self.state.borrow();
        let Some(c) = state.containers.get(container) else {
            return Ok(err_output(1, &format!("Error: No such container: {container}")));
        };
        let networks: serde_json::Map<String, serde_json::Value> = c
            .networks
            .iter()
            .map(|n| (n.clone(), serde_json::json!({ "IPAddress": "" })))
            .collect();
        let body = serde_json::json!([{
            "Name": format!("/{container}"),
            "NetworkSettings": { "IPAddress": c.ip, "Networks": networks },
        }]);
        Ok(ok_output(body.to_string()))
    }
}

impl NetworkControl for FakeRuntime {
    async fn list_networks(&self) -> Result<Output> {
        let mut names = vec!["bridge".to_string(), "host".to_string(), "none".to_string()];
        names.extend(self.networks());
        Ok(ok_output(names.join("\n")))
    }

    async fn create_network(&self, network: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("network create {network}"));
        if !state.networks.insert(network.to_string()) {
            return Ok(err_output(1, &format!("network with name {network} already exists")));
        }
        Ok(ok_output(""))
    }

    async fn remove_network(&self, network: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("network rm {network}"));
        if !state.networks.remove(network) {
            return Ok(err_output(1, &format!("network {network} not found")));
        }
        for c in state.containers.values_mut() {
            c.networks.remove(network);
        }
        Ok(ok_output(""))
    }

    async fn connect_network(&self, network: &str, container: &str) -> Result<Output> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("network connect {network} {container}"));
        if !state.networks.contains(network) {
            return Ok(err_output(1, &format!("network {network} not found")));
        }
        let Some(c) = state.containers.get_mut(container) else {
            return Ok(err_output(1, &format!("No such container: {container}")));
        };
        if !c.running {
            return Ok(err_output(1, &format!("container {container} is not running")));
        }
        if !c.networks.insert(network.to_string()) {
            return Ok(err_output(1, "endpoint already exists in network"));
        }
        Ok(ok_output(""))
    }
}

impl ContainerShell for FakeRuntime {
    async fn exec(&self, container: &str, user: Option<&str>, command: &str) -> Result<Output> {
        Ok(self.shell(container, user, command, None))
    }

    async fn exec_with_stdin(&self, container: &str, command: &str, input: &[u8]) -> Result<Output> {
        Ok(self.shell(container, None, command, Some(input)))
    }

    async fn copy_in(&self, source: &Path, container: &str, dest: &str) -> Result<Output> {
        let Ok(data) = std::fs::read(source) else {
            return Ok(err_output(1, &format!("no such file: {}", source.display())));
        };
        if self.container(container).is_none() {
            return Ok(err_output(1, &format!("No such container: {container}")));
        }
        self.write_file(container, dest, &data);
        Ok(ok_output(""))
    }

    async fn copy_out(&self, container: &str, source: &str, dest: &Path) -> Result<Output> {
        let Some(data) = self.file(container, source) else {
            return Ok(err_output(1, &format!("Could not find the file {source} in container {container}")));
        };
        std::fs::write(dest, data)?;
        Ok(ok_output(""))
    }
}

// ── Fake remote shell ─────────────────────────────────────────────────────────

/// `RemoteShell` that reaches containers of a [`FakeRuntime`] by IP.
#[derive(Debug, Clone)]
pub struct FakeShell {
    runtime: FakeRuntime,
    /// `(ip, user, command)` for every remote call.
    pub calls: Rc<RefCell<Vec<(String, String, String)>>>,
}

impl FakeShell {
    pub fn new(runtime: &FakeRuntime) -> Self {
        Self {
            runtime: runtime.clone(),
            calls: Rc::default(),
        }
    }

    fn refused(ip: &str) -> Output {
        err_output(255, &format!("ssh: connect to host {ip} port 22: Connection refused"))
    }
}

impl RemoteShell for FakeShell {
    async fn run(&self, ip: &str, user: &str, command: &str) -> Result<Output> {
        self.calls
            .borrow_mut()
            .push((ip.to_string(), user.to_string(), command.to_string()));
        match self.runtime.container_by_ip(ip) {
            Some(container) => Ok(self.runtime.shell(&container, Some(user), command, None)),
            None => Ok(Self::refused(ip)),
        }
    }

    async fn copy_to(&self, source: &Path, ip: &str, user: &str, dest: &str) -> Result<Output> {
        self.calls.borrow_mut().push((
            ip.to_string(),
            user.to_string(),
            format!("scp {} {dest}", source.display()),
        ));
        match self.runtime.container_by_ip(ip) {
            Some(container) => self.runtime.copy_in(source, &container, dest).await,
            None => Ok(Self::refused(ip)),
        }
    }

    async fn copy_from(&self, ip: &str, user: &str, source: &str, dest: &Path) -> Result<Output> {
        self.calls.borrow_mut().push((
            ip.to_string(),
            user.to_string(),
            format!("scp {source} {}", dest.display()),
        ));
        match self.runtime.container_by_ip(ip) {
            Some(container) => self.runtime.copy_out(&container, source, dest).await,
            None => Ok(Self::refused(ip)),
        }
    }
}

// ── Fake provisioner ──────────────────────────────────────────────────────────

/// Provisioner that marks every registered container with the distribution
/// it deployed, at `/etc/deployed`.
#[derive(Debug, Clone)]
pub struct FakeProvisioner {
    runtime: FakeRuntime,
    target: Option<PlatformTarget>,
    distribution: Option<String>,
    pub events: Rc<RefCell<Vec<String>>>,
    pub fail_deploy: bool,
}

impl FakeProvisioner {
    pub fn new(runtime: &FakeRuntime) -> Self {
        Self {
            runtime: runtime.clone(),
            target: None,
            distribution: None,
            events: Rc::default(),
            fail_deploy: false,
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn target(&self) -> Option<&PlatformTarget> {
        self.target.as_ref()
    }
}

impl Provisioner for FakeProvisioner {
    fn register_platform(&mut self, platform: PlatformTarget) {
        let containers: Vec<&str> = platform.containers.values().map(String::as_str).collect();
        self.events
            .borrow_mut()
            .push(format!("register {}", containers.join(",")));
        self.target = Some(platform);
    }

    fn set_platform(&mut self, distribution: &str) {
        self.events
            .borrow_mut()
            .push(format!("set_platform {distribution}"));
        self.distribution = Some(distribution.to_string());
    }

    async fn deploy_from_scratch(&mut self, force: bool) -> Result<()> {
        self.events.borrow_mut().push(format!("deploy force={force}"));
        if self.fail_deploy {
            bail!("deployment failed");
        }
        let (Some(target), Some(distribution)) = (&self.target, &self.distribution) else {
            bail!("no platform registered");
        };
        for container in target.containers.values() {
            self.runtime
                .write_file(container, "/etc/deployed", distribution.as_bytes());
        }
        Ok(())
    }
}

// ── Recording command runner ──────────────────────────────────────────────────

/// One recorded invocation: program, arguments, timeout override, stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
    pub stdin: Option<Vec<u8>>,
}

/// `CommandRunner` that records every call and answers with a canned output.
#[derive(Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    result: Arc<dyn Fn() -> Result<Output> + Send + Sync>,
}

impl RecordingRunner {
    pub fn new_ok() -> Self {
        Self::answering(|| Ok(ok_output("")))
    }

    pub fn new_err(msg: &'static str) -> Self {
        Self::answering(move || bail!("{msg}"))
    }

    pub fn answering(result: impl Fn() -> Result<Output> + Send + Sync + 'static) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            result: Arc::new(result),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    /// Arguments of the only recorded call.
    pub fn single_args(&self) -> Vec<String> {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected one call, got {calls:?}");
        calls[0].args.clone()
    }

    fn record(&self, program: &str, args: &[&str], timeout: Option<Duration>, stdin: Option<&[u8]>) -> Result<Output> {
        self.calls.lock().expect("mutex poisoned").push(RecordedCall {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            timeout,
            stdin: stdin.map(<[u8]>::to_vec),
        });
        (self.result)()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None, None)
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration) -> Result<Output> {
        self.record(program, args, Some(timeout), None)
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        self.record(program, args, None, Some(stdin))
    }
}

// ── Platform helpers ──────────────────────────────────────────────────────────

pub type FakePlatform = PlatformManager<FakeRuntime, FakeShell>;

/// Two hosts on one image, as most tests use.
pub fn two_host_layout() -> PlatformLayout {
    PlatformLayout::builder("test", [("host1", "testimage"), ("host2", "testimage")])
        .build()
        .expect("valid layout")
}

pub fn platform_with(layout: PlatformLayout, runtime: &FakeRuntime) -> FakePlatform {
    PlatformManager::new(layout, runtime.clone(), FakeShell::new(runtime))
}

pub fn two_host_platform(runtime: &FakeRuntime) -> FakePlatform {
    platform_with(two_host_layout(), runtime)
}
