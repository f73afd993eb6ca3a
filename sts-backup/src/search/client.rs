use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::SearchEngine;
use crate::constants::http::{CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use crate::types::{IndexInfo, RepositorySettings, SlmPolicy, SnapshotDescriptor, SnapshotsResponse};

const DETAILED_INDEX_COLUMNS: &str =
    "health,status,index,uuid,pri,rep,docs.count,docs.deleted,store.size,pri.store.size,dataset.size";

/// HTTP client for the Elasticsearch REST API
pub struct ElasticsearchClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CatIndexRow {
    index: String,
}

impl ElasticsearchClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to create Elasticsearch client: {}", e))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Client for a tunnel listening on `localhost:<port>`
    pub fn for_local_port(port: u16) -> Result<Self> {
        Self::new(format!("http://localhost:{}", port))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(anyhow!("elasticsearch returned error: [{}] {}", status, body))
    }

    async fn fetch_snapshots(&self, repository: &str, selector: &str) -> Result<Vec<SnapshotDescriptor>> {
        let url = self.url(&format!("/_snapshot/{}/{}", repository, selector));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to get snapshots: {}", e))?;

        let parsed: SnapshotsResponse = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to decode response: {}", e))?;

        Ok(parsed.snapshots)
    }
}

#[async_trait]
impl SearchEngine for ElasticsearchClient {
    async fn list_snapshots(&self, repository: &str) -> Result<Vec<SnapshotDescriptor>> {
        self.fetch_snapshots(repository, "_all").await
    }

    async fn get_snapshot(&self, repository: &str, name: &str) -> Result<SnapshotDescriptor> {
        self.fetch_snapshots(repository, name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("snapshot {} not found", name))
    }

    async fn restore_snapshot(
        &self,
        repository: &str,
        name: &str,
        indices_pattern: &str,
        wait_for_completion: bool,
    ) -> Result<()> {
        let url = self.url(&format!("/_snapshot/{}/{}/_restore", repository, name));
        debug!("POST {} (wait_for_completion={})", url, wait_for_completion);

        // No request timeout: a synchronous restore lasts as long as the data copy
        let response = self
            .client
            .post(&url)
            .query(&[("wait_for_completion", wait_for_completion)])
            .json(&json!({ "indices": indices_pattern }))
            .send()
            .await
            .map_err(|e| anyhow!("Failed to restore snapshot: {}", e))?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>> {
        let url = self.url(&format!("/_cat/indices/{}", pattern));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("h", "index")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to list indices: {}", e))?;

        let rows: Vec<CatIndexRow> = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to decode response: {}", e))?;

        Ok(rows.into_iter().map(|row| row.index).collect())
    }

    async fn list_indices_detailed(&self) -> Result<Vec<IndexInfo>> {
        let url = self.url("/_cat/indices");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("h", DETAILED_INDEX_COLUMNS)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to list indices: {}", e))?;

        Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to decode response: {}", e))
    }

    async fn delete_index(&self, index: &str) -> Result<()> {
        let url = self.url(&format!("/{}", index));
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to delete index: {}", e))?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let url = self.url(&format!("/{}", index));

        let response = self
            .client
            .head(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to check index existence: {}", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::ensure_success(response).await?;
        Ok(true)
    }

    async fn rollover_data_stream(&self, name: &str) -> Result<()> {
        let url = self.url(&format!("/{}/_rollover", name));
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to rollover datastream: {}", e))?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn configure_snapshot_repository(&self, settings: &RepositorySettings) -> Result<()> {
        let url = self.url(&format!("/_snapshot/{}", settings.name));
        debug!("PUT {}", url);

        let body = json!({
            "type": "s3",
            "settings": {
                "bucket": settings.bucket,
                "region": "minio",
                "endpoint": settings.endpoint,
                "base_path": settings.base_path,
                "protocol": "http",
                "access_key": settings.access_key,
                "secret_key": settings.secret_key,
                "path_style_access": "true",
            }
        });

        let response = self
            .client
            .put(&url)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to create snapshot repository: {}", e))?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn configure_slm_policy(&self, policy: &SlmPolicy) -> Result<()> {
        let url = self.url(&format!("/_slm/policy/{}", policy.name));
        debug!("PUT {}", url);

        let body = json!({
            "schedule": policy.schedule,
            "name": policy.snapshot_template_name,
            "repository": policy.repository,
            "config": {
                "indices": policy.indices,
                "ignore_unavailable": false,
                "include_global_state": false,
            },
            "retention": {
                "expire_after": policy.retention_expire_after,
                "min_count": policy.retention_min_count,
                "max_count": policy.retention_max_count,
            }
        });

        let response = self
            .client
            .put(&url)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to create SLM policy: {}", e))?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
