use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command as AsyncCommand;
use tracing::{debug, info};

use super::WorkloadLifecycle;
use crate::types::Workload;

/// Deployments in one namespace, driven through the `kubectl` binary
#[derive(Debug, Clone)]
pub struct KubectlWorkloads {
    namespace: String,
    kubeconfig: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct DeploymentList {
    #[serde(default)]
    items: Vec<Deployment>,
}

#[derive(Debug, Deserialize)]
struct Deployment {
    metadata: Metadata,
    #[serde(default)]
    spec: DeploymentSpec,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct DeploymentSpec {
    replicas: Option<u32>,
}

impl From<Deployment> for Workload {
    fn from(deployment: Deployment) -> Self {
        Workload {
            name: deployment.metadata.name,
            replicas: deployment.spec.replicas.unwrap_or(0),
        }
    }
}

impl KubectlWorkloads {
    pub fn new(namespace: impl Into<String>, kubeconfig: Option<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            kubeconfig,
        }
    }

    /// Arguments shared by every invocation
    pub(crate) fn base_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }
        args.push("--namespace".to_string());
        args.push(self.namespace.clone());
        args
    }

    async fn kubectl(&self, args: &[&str]) -> Result<String> {
        let mut command = AsyncCommand::new("kubectl");
        command.args(self.base_args()).args(args);
        debug!("Executing kubectl {}", args.join(" "));

        let output = command
            .output()
            .await
            .map_err(|e| anyhow!("Failed to run kubectl: {}", e))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("kubectl {} failed: {}", args.join(" "), error.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl WorkloadLifecycle for KubectlWorkloads {
    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<Workload>> {
        let stdout = self
            .kubectl(&["get", "deployments", "-l", label_selector, "-o", "json"])
            .await?;

        let list: DeploymentList = serde_json::from_str(&stdout)
            .map_err(|e| anyhow!("Failed to parse deployment list: {}", e))?;

        Ok(list.items.into_iter().map(Workload::from).collect())
    }

    async fn get_workload(&self, name: &str) -> Result<Workload> {
        let resource = format!("deployment/{}", name);
        let stdout = self.kubectl(&["get", &resource, "-o", "json"]).await?;

        let deployment: Deployment = serde_json::from_str(&stdout)
            .map_err(|e| anyhow!("Failed to parse deployment {}: {}", name, e))?;

        Ok(deployment.into())
    }

    async fn set_replicas(&self, name: &str, replicas: u32) -> Result<()> {
        let resource = format!("deployment/{}", name);
        let replicas_arg = format!("--replicas={}", replicas);
        self.kubectl(&["scale", &resource, &replicas_arg]).await?;

        info!("Deployment {} scaled to {} replica(s)", name, replicas);
        Ok(())
    }
}
