use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command as AsyncCommand};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::constants::tunnel::READY_MARKER;
use crate::errors::RestoreError;

/// `kubectl port-forward` to a service, alive until closed or dropped.
pub struct PortForward {
    child: Child,
    local_port: u16,
}

impl PortForward {
    /// Start the tunnel and wait until kubectl reports it is listening.
    ///
    /// `kube_args` carries the kubeconfig and namespace flags.
    pub async fn open(
        kube_args: Vec<String>,
        service: &str,
        local_port: u16,
        remote_port: u16,
        ready_timeout: Duration,
    ) -> Result<Self, RestoreError> {
        let target = format!("svc/{}", service);
        let ports = format!("{}:{}", local_port, remote_port);
        info!("Setting up port-forward to {}:{}", service, remote_port);

        let mut command = AsyncCommand::new("kubectl");
        command
            .args(kube_args)
            .arg("port-forward")
            .arg(&target)
            .arg(&ports)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| RestoreError::Dependency {
            reason: format!("failed to spawn kubectl port-forward: {}", e),
        })?;

        let stdout = child.stdout.take().ok_or_else(|| RestoreError::Dependency {
            reason: "port-forward stdout not captured".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| RestoreError::Dependency {
            reason: "port-forward stderr not captured".to_string(),
        })?;

        let (ready_tx, ready_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let mut ready_tx = Some(ready_tx);
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            while let Ok(bytes_read) = reader.read_line(&mut line).await {
                if bytes_read == 0 {
                    break;
                }
                debug!("port-forward: {}", line.trim());
                if line.starts_with(READY_MARKER) {
                    if let Some(tx) = ready_tx.take() {
                        let _ = tx.send(());
                    }
                }
                line.clear();
            }
        });

        tokio::spawn(async move {
            let mut reader = BufReader::new(stderr);
            let mut line = String::new();
            while let Ok(bytes_read) = reader.read_line(&mut line).await {
                if bytes_read == 0 {
                    break;
                }
                warn!("port-forward: {}", line.trim());
                line.clear();
            }
        });

        let mut tunnel = Self { child, local_port };

        match timeout(ready_timeout, ready_rx).await {
            Ok(Ok(())) => {
                info!("✓ Port-forward established on localhost:{}", local_port);
                Ok(tunnel)
            }
            Ok(Err(_)) => {
                tunnel.shutdown().await;
                Err(RestoreError::Dependency {
                    reason: format!("port-forward to {} exited before becoming ready", target),
                })
            }
            Err(_) => {
                tunnel.shutdown().await;
                Err(RestoreError::Dependency {
                    reason: format!(
                        "port-forward to {} not ready after {}s",
                        target,
                        ready_timeout.as_secs()
                    ),
                })
            }
        }
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    pub async fn close(mut self) {
        self.shutdown().await;
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!("port-forward already stopped: {}", e);
        }
    }
}
