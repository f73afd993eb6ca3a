pub mod configure;
pub mod list_indices;
pub mod list_snapshots;
pub mod restore_snapshot;

use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::constants::tunnel::READY_TIMEOUT;
use crate::search::ElasticsearchClient;
use crate::tunnel::PortForward;
use crate::workloads::KubectlWorkloads;

/// Everything a command needs: parsed options and the loaded configuration
pub struct CommandContext {
    pub global: GlobalOptions,
    pub config: Arc<Config>,
}

impl CommandContext {
    pub fn new(global: GlobalOptions, config: Arc<Config>) -> Self {
        Self { global, config }
    }

    pub fn workloads(&self) -> KubectlWorkloads {
        KubectlWorkloads::new(self.global.namespace.clone(), self.global.kubeconfig.clone())
    }

    /// Open the tunnel to the Elasticsearch service and build a client on it.
    ///
    /// The tunnel must outlive every call made through the client.
    pub async fn connect(&self) -> Result<(PortForward, ElasticsearchClient)> {
        let service = &self.config.elasticsearch.service;
        let local_port = to_port("local_port_forward_port", service.local_port_forward_port)?;
        let remote_port = to_port("port", service.port)?;

        let tunnel = PortForward::open(
            self.workloads().base_args(),
            &service.name,
            local_port,
            remote_port,
            READY_TIMEOUT,
        )
        .await?;

        let client = ElasticsearchClient::for_local_port(tunnel.local_port())?;
        Ok((tunnel, client))
    }
}

fn to_port(field: &str, value: u32) -> Result<u16> {
    u16::try_from(value).map_err(|_| anyhow!("service {} {} is not a valid port", field, value))
}
