use super::secrets::SecretsLoader;
use super::Config;
use crate::errors::ConfigError;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_path: &Path, secrets_path: &Path) -> Result<Self> {
        let config = Self::load_configuration(config_path, secrets_path).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_path: &Path, secrets_path: &Path) -> Result<Config> {
        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut merged: toml::Table =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!("Merging secrets overlay from {}", secrets_path.display());
        SecretsLoader::load(secrets_path).await?.merge_into(&mut merged);

        let config: Config = toml::Value::Table(merged)
            .try_into()
            .map_err(|e| ConfigError::ParseError {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.validate()?;

        info!(
            "Configuration loaded: service {}, repository {}",
            config.elasticsearch.service.name, config.elasticsearch.restore.repository
        );

        Ok(config)
    }
}
