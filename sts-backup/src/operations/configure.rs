use anyhow::{anyhow, Result};
use tracing::info;

use super::CommandContext;
use crate::config::Config;
use crate::search::SearchEngine;

/// Register the S3 snapshot repository and the SLM policy
pub async fn execute(ctx: &CommandContext) -> Result<()> {
    check_credentials(&ctx.config)?;

    let (tunnel, client) = ctx.connect().await?;
    let result = apply(&client, &ctx.config).await;
    tunnel.close().await;
    result?;

    info!("✓ Configuration completed successfully");
    Ok(())
}

pub async fn apply(search: &dyn SearchEngine, config: &Config) -> Result<()> {
    let repository = config.repository_settings();
    info!(
        "Configuring snapshot repository '{}' (bucket: {})...",
        repository.name, repository.bucket
    );
    search
        .configure_snapshot_repository(&repository)
        .await
        .map_err(|e| anyhow!("Failed to configure snapshot repository: {}", e))?;
    info!("✓ Snapshot repository configured successfully");

    let policy = config.slm_policy();
    info!("Configuring SLM policy '{}'...", policy.name);
    search
        .configure_slm_policy(&policy)
        .await
        .map_err(|e| anyhow!("Failed to configure SLM policy: {}", e))?;
    info!("✓ SLM policy configured successfully");

    Ok(())
}

pub fn check_credentials(config: &Config) -> Result<()> {
    let repository = &config.elasticsearch.snapshot_repository;
    if repository.access_key.trim().is_empty() || repository.secret_key.trim().is_empty() {
        return Err(anyhow!(
            "access_key and secret_key are required in the secrets configuration"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_are_required() {
        let mut config = Config::default();
        assert!(check_credentials(&config).is_err());

        config.elasticsearch.snapshot_repository.access_key = "minio".to_string();
        assert!(check_credentials(&config).is_err());

        config.elasticsearch.snapshot_repository.secret_key = "minio123".to_string();
        assert!(check_credentials(&config).is_ok());
    }
}
