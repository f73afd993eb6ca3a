pub mod client;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{IndexInfo, RepositorySettings, SlmPolicy, SnapshotDescriptor};
pub use client::ElasticsearchClient;

/// Search engine operations the tool relies on.
///
/// Implemented by [`ElasticsearchClient`] and by in-memory doubles in tests.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    // Snapshot operations
    async fn list_snapshots(&self, repository: &str) -> Result<Vec<SnapshotDescriptor>>;
    async fn get_snapshot(&self, repository: &str, name: &str) -> Result<SnapshotDescriptor>;
    async fn restore_snapshot(
        &self,
        repository: &str,
        name: &str,
        indices_pattern: &str,
        wait_for_completion: bool,
    ) -> Result<()>;

    // Index operations
    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>>;
    async fn list_indices_detailed(&self) -> Result<Vec<IndexInfo>>;
    async fn delete_index(&self, index: &str) -> Result<()>;
    async fn index_exists(&self, index: &str) -> Result<bool>;

    // Data stream operations
    async fn rollover_data_stream(&self, name: &str) -> Result<()>;

    // Repository and lifecycle policy setup
    async fn configure_snapshot_repository(&self, settings: &RepositorySettings) -> Result<()>;
    async fn configure_slm_policy(&self, policy: &SlmPolicy) -> Result<()>;
}
