pub mod manager;
pub mod secrets;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{RepositorySettings, SlmPolicy};
pub use manager::ConfigManager;

// Every field defaults so that a value missing from both files is reported
// by `validate` with its full path instead of a serde parse error.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub elasticsearch: ElasticsearchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchConfig {
    pub service: ServiceConfig,
    pub restore: RestoreConfig,
    pub snapshot_repository: SnapshotRepositoryConfig,
    pub slm: SlmConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub port: u32,
    pub local_port_forward_port: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    pub scale_down_label_selector: String,
    pub index_prefix: String,
    pub datastream_index_prefix: String,
    pub datastream_name: String,
    pub indices_pattern: String,
    pub repository: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotRepositoryConfig {
    pub name: String,
    pub bucket: String,
    pub endpoint: String,
    pub base_path: String,
    // Usually supplied through the secrets overlay
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlmConfig {
    pub name: String,
    pub schedule: String,
    pub snapshot_template_name: String,
    pub repository: String,
    pub indices: String,
    pub retention_expire_after: String,
    pub retention_min_count: u32,
    pub retention_max_count: u32,
}

impl Config {
    /// Check that the merged configuration has every value the commands need.
    ///
    /// Credentials are checked separately by the `configure` command since
    /// the restore path never uses them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let es = &self.elasticsearch;

        let required = [
            ("elasticsearch.service.name", &es.service.name),
            (
                "elasticsearch.restore.scale_down_label_selector",
                &es.restore.scale_down_label_selector,
            ),
            ("elasticsearch.restore.index_prefix", &es.restore.index_prefix),
            (
                "elasticsearch.restore.datastream_index_prefix",
                &es.restore.datastream_index_prefix,
            ),
            ("elasticsearch.restore.datastream_name", &es.restore.datastream_name),
            ("elasticsearch.restore.indices_pattern", &es.restore.indices_pattern),
            ("elasticsearch.restore.repository", &es.restore.repository),
            ("elasticsearch.snapshot_repository.name", &es.snapshot_repository.name),
            ("elasticsearch.snapshot_repository.bucket", &es.snapshot_repository.bucket),
            (
                "elasticsearch.snapshot_repository.endpoint",
                &es.snapshot_repository.endpoint,
            ),
            ("elasticsearch.slm.name", &es.slm.name),
            ("elasticsearch.slm.schedule", &es.slm.schedule),
            (
                "elasticsearch.slm.snapshot_template_name",
                &es.slm.snapshot_template_name,
            ),
            ("elasticsearch.slm.repository", &es.slm.repository),
            ("elasticsearch.slm.indices", &es.slm.indices),
            (
                "elasticsearch.slm.retention_expire_after",
                &es.slm.retention_expire_after,
            ),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingRequired {
                    field: field.to_string(),
                });
            }
        }

        validate_port("elasticsearch.service.port", es.service.port)?;
        validate_port(
            "elasticsearch.service.local_port_forward_port",
            es.service.local_port_forward_port,
        )?;

        if es.slm.retention_min_count < 1 {
            return Err(ConfigError::InvalidValue {
                field: "elasticsearch.slm.retention_min_count".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if es.slm.retention_max_count < 1 {
            return Err(ConfigError::InvalidValue {
                field: "elasticsearch.slm.retention_max_count".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn repository_settings(&self) -> RepositorySettings {
        let repo = &self.elasticsearch.snapshot_repository;
        RepositorySettings {
            name: repo.name.clone(),
            bucket: repo.bucket.clone(),
            endpoint: repo.endpoint.clone(),
            base_path: repo.base_path.clone(),
            access_key: repo.access_key.clone(),
            secret_key: repo.secret_key.clone(),
        }
    }

    pub fn slm_policy(&self) -> SlmPolicy {
        let slm = &self.elasticsearch.slm;
        SlmPolicy {
            name: slm.name.clone(),
            schedule: slm.schedule.clone(),
            snapshot_template_name: slm.snapshot_template_name.clone(),
            repository: slm.repository.clone(),
            indices: slm.indices.clone(),
            retention_expire_after: slm.retention_expire_after.clone(),
            retention_min_count: slm.retention_min_count,
            retention_max_count: slm.retention_max_count,
        }
    }
}

fn validate_port(field: &str, port: u32) -> Result<(), ConfigError> {
    if port == 0 || port > u32::from(u16::MAX) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{} is not in 1..=65535", port),
        });
    }
    Ok(())
}
