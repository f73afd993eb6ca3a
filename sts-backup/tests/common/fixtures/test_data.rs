//! Common test data

use sts_backup::config::RestoreConfig;
use sts_backup::types::{SnapshotDescriptor, SnapshotState};

pub const SNAPSHOT_NAME: &str = "sts-backup-20250101-0300";
pub const REPOSITORY: &str = "sts-backup";
pub const DATA_STREAM: &str = "sts_k8s_logs";

pub fn restore_config() -> RestoreConfig {
    RestoreConfig {
        scale_down_label_selector: "observability.suse.com/scalable-during-es-restore=true"
            .to_string(),
        index_prefix: "sts_".to_string(),
        datastream_index_prefix: DATA_STREAM.to_string(),
        datastream_name: DATA_STREAM.to_string(),
        indices_pattern: "sts*,.ds-sts_k8s_logs*".to_string(),
        repository: REPOSITORY.to_string(),
    }
}

pub fn snapshot(name: &str, state: SnapshotState) -> SnapshotDescriptor {
    SnapshotDescriptor {
        name: name.to_string(),
        repository: REPOSITORY.to_string(),
        indices: vec!["sts_topology".to_string(), "sts_metrics".to_string()],
        state,
        start_time: Some("2025-01-01T03:00:00.000Z".to_string()),
        start_time_in_millis: Some(1_735_700_400_000),
        duration_in_millis: Some(5230),
        failures: Vec::new(),
    }
}

pub fn successful_snapshot() -> SnapshotDescriptor {
    snapshot(SNAPSHOT_NAME, SnapshotState::Success)
}
