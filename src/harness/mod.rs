//! Container harness for the image under test
//!
//! Thin layer over the Docker engine API: one-shot runs with captured
//! output for sanity checks and report generation, and detached runs with
//! a published port for the serve UI. Every detached container is owned by
//! a [`ServeGuard`] whose teardown must run on all exit paths.

pub mod checks;
pub mod wait;

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use bollard::container::{
    Config, LogsOptions, RemoveContainerOptions, StartContainerOptions,
    StopContainerOptions, WaitContainerOptions,
};
use bollard::models::{HostConfig, PortBinding};
use bollard::Docker;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::common::{Error, Result};

/// Environment variable overriding the image reference under test
pub const IMAGE_ENV: &str = "ALLURE_IMAGE";

/// Seconds a serve container is given to shut down before it is killed
const STOP_GRACE_SECS: i64 = 5;

/// Resolve the image reference under test from the environment
pub fn image_under_test() -> String {
    env::var(IMAGE_ENV).unwrap_or_else(|_| crate::commands::DEFAULT_IMAGE.to_string())
}

/// A host path mounted into the container
#[derive(Debug, Clone)]
pub struct Bind {
    host: PathBuf,
    container: String,
    read_only: bool,
}

impl Bind {
    /// Mount `host` read-only at `container`
    pub fn ro(host: impl AsRef<Path>, container: impl Into<String>) -> Self {
        Self {
            host: host.as_ref().to_path_buf(),
            container: container.into(),
            read_only: true,
        }
    }

    /// Mount `host` read-write at `container`
    pub fn rw(host: impl AsRef<Path>, container: impl Into<String>) -> Self {
        Self {
            host: host.as_ref().to_path_buf(),
            container: container.into(),
            read_only: false,
        }
    }

    fn render(&self) -> String {
        let mode = if self.read_only { "ro" } else { "rw" };
        format!("{}:{}:{}", self.host.display(), self.container, mode)
    }
}

/// Connection to the Docker daemon plus the image reference under test
pub struct Harness {
    docker: Docker,
    image: String,
}

impl Harness {
    /// Connect to the local Docker daemon; image taken from `ALLURE_IMAGE`
    ///
    /// A missing or unreachable daemon is an environment precondition
    /// failure and surfaces as-is.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Docker::connect_with_socket_defaults()?, image_under_test()))
    }

    /// Connect to the local Docker daemon with an explicit image reference
    pub fn with_image(image: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Docker::connect_with_socket_defaults()?, image.into()))
    }

    fn new(docker: Docker, image: String) -> Self {
        Self { docker, image }
    }

    /// The image reference this harness runs
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Run a command in the image to completion and capture combined output
    ///
    /// The container is removed after the run. A non-zero exit status is an
    /// error carrying the captured output.
    pub async fn run_to_completion(&self, cmd: &[&str], binds: &[Bind]) -> Result<String> {
        let id = self.create(cmd, binds, None).await?;

        self.docker
            .start_container(&id, None::<StartContainerOptions<String>>)
            .await?;

        let code = self.wait_for_exit(&id).await;
        let output = self.collect_logs(&id).await;
        self.remove(&id).await;

        let code = code?;
        let output = output?;
        if code != 0 {
            return Err(Error::ContainerFailed { code, output });
        }
        Ok(output)
    }

    /// Start a command detached with one published port
    ///
    /// Returns a guard owning the container; the caller must tear it down.
    pub async fn serve(
        &self,
        cmd: &[&str],
        binds: &[Bind],
        host_port: u16,
        container_port: u16,
    ) -> Result<ServeGuard> {
        let id = self.create(cmd, binds, Some((host_port, container_port))).await?;

        self.docker
            .start_container(&id, None::<StartContainerOptions<String>>)
            .await?;
        debug!(container = %id, host_port, "serve container started");

        Ok(ServeGuard {
            docker: self.docker.clone(),
            id,
        })
    }

    async fn create(
        &self,
        cmd: &[&str],
        binds: &[Bind],
        port: Option<(u16, u16)>,
    ) -> Result<String> {
        let mut host_config = HostConfig {
            binds: if binds.is_empty() {
                None
            } else {
                Some(binds.iter().map(Bind::render).collect())
            },
            ..Default::default()
        };

        let mut exposed_ports = None;
        if let Some((host_port, container_port)) = port {
            let key = format!("{container_port}/tcp");
            let binding = PortBinding {
                host_ip: Some("0.0.0.0".to_string()),
                host_port: Some(host_port.to_string()),
            };
            host_config.port_bindings =
                Some(HashMap::from([(key.clone(), Some(vec![binding]))]));
            exposed_ports = Some(HashMap::from([(key, HashMap::new())]));
        }

        let config = Config {
            image: Some(self.image.clone()),
            cmd: Some(cmd.iter().map(ToString::to_string).collect()),
            exposed_ports,
            host_config: Some(host_config),
            ..Default::default()
        };

        let created = self
            .docker
            .create_container::<String, String>(None, config)
            .await?;
        Ok(created.id)
    }

    async fn wait_for_exit(&self, id: &str) -> Result<i64> {
        let mut wait = self
            .docker
            .wait_container(id, None::<WaitContainerOptions<String>>);

        match wait.next().await {
            Some(Ok(resp)) => Ok(resp.status_code),
            // bollard reports a non-zero exit status through this variant
            Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. })) => Ok(code),
            Some(Err(e)) => Err(e.into()),
            None => Ok(0),
        }
    }

    async fn collect_logs(&self, id: &str) -> Result<String> {
        collect_logs(&self.docker, id).await
    }

    async fn remove(&self, id: &str) {
        let opts = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        if let Err(e) = self.docker.remove_container(id, Some(opts)).await {
            warn!(container = %id, "failed to remove container: {e}");
        }
    }
}

/// Combined stdout+stderr of a container, decoded lossily
async fn collect_logs(docker: &Docker, id: &str) -> Result<String> {
    let opts = LogsOptions::<String> {
        stdout: true,
        stderr: true,
        follow: false,
        ..Default::default()
    };

    let mut stream = docker.logs(id, Some(opts));
    let mut output = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        output.push_str(&String::from_utf8_lossy(&chunk.into_bytes()));
    }
    Ok(output)
}

/// Owns a detached serve container until torn down
///
/// Teardown is best-effort: a secondary error while stopping or removing
/// the container is logged as a warning so it cannot mask the primary
/// test outcome.
pub struct ServeGuard {
    docker: Docker,
    id: String,
}

impl ServeGuard {
    /// Container id, for diagnostics
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Captured logs of the running container
    pub async fn logs(&self) -> String {
        collect_logs(&self.docker, &self.id)
            .await
            .unwrap_or_else(|e| format!("<failed to fetch container logs: {e}>"))
    }

    /// Stop and remove the container
    pub async fn teardown(self) {
        let stop = StopContainerOptions { t: STOP_GRACE_SECS };
        if let Err(e) = self.docker.stop_container(&self.id, Some(stop)).await {
            warn!(container = %self.id, "error stopping container: {e}");
        }

        let remove = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        if let Err(e) = self.docker.remove_container(&self.id, Some(remove)).await {
            warn!(container = %self.id, "error removing container: {e}");
        }
    }
}
