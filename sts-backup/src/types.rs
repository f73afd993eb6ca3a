use serde::{Deserialize, Serialize};
use std::fmt;

// === WORKLOADS ===

/// A deployable unit as reported by the workload platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub name: String,
    pub replicas: u32,
}

/// Replica count of a workload captured before it was paused.
///
/// Created once per pause, never recomputed, consumed by the resume step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSnapshot {
    pub name: String,
    pub original_replicas: u32,
}

// === SEARCH ENGINE ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotState {
    InProgress,
    Success,
    Partial,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SnapshotState::InProgress => "IN_PROGRESS",
            SnapshotState::Success => "SUCCESS",
            SnapshotState::Partial => "PARTIAL",
            SnapshotState::Failed => "FAILED",
            SnapshotState::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Snapshot metadata as returned by the snapshot API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    #[serde(rename = "snapshot")]
    pub name: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub indices: Vec<String>,
    pub state: SnapshotState,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub start_time_in_millis: Option<i64>,
    #[serde(default)]
    pub duration_in_millis: Option<i64>,
    #[serde(default)]
    pub failures: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotsResponse {
    #[serde(default)]
    pub snapshots: Vec<SnapshotDescriptor>,
}

/// Row of the `_cat/indices` API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexInfo {
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub status: String,
    pub index: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub pri: String,
    #[serde(default)]
    pub rep: String,
    #[serde(rename = "docs.count", default)]
    pub docs_count: Option<String>,
    #[serde(rename = "docs.deleted", default)]
    pub docs_deleted: Option<String>,
    #[serde(rename = "store.size", default)]
    pub store_size: Option<String>,
    #[serde(rename = "pri.store.size", default)]
    pub pri_store_size: Option<String>,
    #[serde(rename = "dataset.size", default)]
    pub dataset_size: Option<String>,
}

/// S3 snapshot repository registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySettings {
    pub name: String,
    pub bucket: String,
    pub endpoint: String,
    pub base_path: String,
    pub access_key: String,
    pub secret_key: String,
}

/// Snapshot lifecycle management policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlmPolicy {
    pub name: String,
    pub schedule: String,
    pub snapshot_template_name: String,
    pub repository: String,
    pub indices: String,
    pub retention_expire_after: String,
    pub retention_min_count: u32,
    pub retention_max_count: u32,
}
