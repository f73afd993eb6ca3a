//! Secrets overlay for sensitive configuration.
//!
//! Credentials live in a separate TOML file (config/secrets.toml) that should
//! be excluded from version control. It uses the same layout as the main
//! configuration and is merged on top of it key by key.
//!
//! Example secrets.toml:
//! ```toml
//! [elasticsearch.snapshot_repository]
//! access_key = "minio-access-key"
//! secret_key = "minio-secret-key"
//! ```

use anyhow::{Context, Result};
use std::path::Path;
use toml::{Table, Value};
use tracing::{info, warn};

/// Loader for the secrets overlay file
pub struct SecretsLoader {
    overlay: Table,
}

impl SecretsLoader {
    /// Load secrets from `secrets_path`.
    /// Returns an empty overlay if the file doesn't exist.
    pub async fn load(secrets_path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(secrets_path).await.unwrap_or(false) {
            warn!(
                "Secrets file not found at {:?}, using main configuration only",
                secrets_path
            );
            return Ok(Self {
                overlay: Table::new(),
            });
        }

        let content = tokio::fs::read_to_string(secrets_path)
            .await
            .with_context(|| format!("Failed to read secrets file: {:?}", secrets_path))?;

        let overlay: Table = toml::from_str(&content)
            .with_context(|| format!("Failed to parse secrets file: {:?}", secrets_path))?;

        info!("Loaded secrets overlay from {:?}", secrets_path);

        Ok(Self { overlay })
    }

    /// Merge the overlay into `base`. Non-empty overlay values win.
    pub fn merge_into(&self, base: &mut Table) {
        merge_tables(base, &self.overlay);
    }
}

fn merge_tables(base: &mut Table, overlay: &Table) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            _ if is_zero_value(value) => {}
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

fn is_zero_value(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Integer(i) => *i == 0,
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}
