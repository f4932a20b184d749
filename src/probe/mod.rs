//! Daemon health probe
//!
//! The patcher only makes sense against a daemon that will reload the file,
//! so the CLI checks the daemon is reachable before mutating anything. The
//! probe is a trait so the gating logic can be tested without a live daemon.

use serde::{Deserialize, Serialize};
use std::process::Command;

use crate::error::PatchError;

/// Health status of the collaborating daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The daemon responded.
    Running {
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
    /// The daemon did not respond; `detail` says why.
    NotRunning { detail: String },
}

impl ProbeStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Status probe for the external daemon whose config is being patched.
pub trait DaemonProbe {
    fn status(&self) -> ProbeStatus;
}

/// Confirm the daemon is running before any file mutation.
///
/// Returns the precondition error kind when it is not, so callers can
/// short-circuit the whole operation with an actionable message.
pub fn ensure_daemon_running(probe: &dyn DaemonProbe) -> Result<(), PatchError> {
    match probe.status() {
        ProbeStatus::Running { .. } => Ok(()),
        ProbeStatus::NotRunning { detail } => Err(PatchError::Precondition { detail }),
    }
}

/// Probes the Docker daemon by shelling out to the `docker` CLI.
pub struct DockerCliProbe {
    docker_bin: String,
}

impl DockerCliProbe {
    pub fn new() -> Self {
        Self {
            docker_bin: "docker".to_string(),
        }
    }

    /// Use a non-default `docker` binary (tests point this at a stub).
    pub fn with_binary(docker_bin: impl Into<String>) -> Self {
        Self {
            docker_bin: docker_bin.into(),
        }
    }
}

impl Default for DockerCliProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DaemonProbe for DockerCliProbe {
    fn status(&self) -> ProbeStatus {
        // `docker version` with a server-side format only succeeds when the
        // daemon is reachable; client-only failures exit non-zero.
        let output = Command::new(&self.docker_bin)
            .args(["version", "--format", "{{.Server.Version}}"])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                ProbeStatus::Running {
                    version: if version.is_empty() {
                        None
                    } else {
                        Some(version)
                    },
                }
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let detail = if stderr.is_empty() {
                    format!("'{} version' exited with {}", self.docker_bin, output.status)
                } else {
                    stderr
                };
                ProbeStatus::NotRunning { detail }
            }
            Err(e) => ProbeStatus::NotRunning {
                detail: format!("failed to run '{}': {}", self.docker_bin, e),
            },
        }
    }
}
