use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use super::CommandContext;
use crate::output::{Formatter, Table};
use crate::search::SearchEngine;
use crate::types::SnapshotDescriptor;

const HEADERS: [&str; 5] = ["SNAPSHOT", "STATE", "START TIME", "DURATION (ms)", "FAILURES"];

pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let (tunnel, client) = ctx.connect().await?;

    let repository = &ctx.config.elasticsearch.restore.repository;
    info!("Fetching snapshots from repository '{}'...", repository);
    let snapshots = client.list_snapshots(repository).await;
    tunnel.close().await;

    let snapshots = snapshots.map_err(|e| anyhow!("Failed to list snapshots: {}", e))?;

    let mut formatter = Formatter::stdout(ctx.global.output);
    if snapshots.is_empty() {
        return formatter.print_message("No snapshots found");
    }
    formatter.print_table(&snapshot_table(&snapshots))
}

pub fn snapshot_table(snapshots: &[SnapshotDescriptor]) -> Table {
    let mut table = Table::new(&HEADERS);
    for snapshot in snapshots {
        table.push_row(vec![
            snapshot.name.clone(),
            snapshot.state.to_string(),
            start_time(snapshot),
            snapshot.duration_in_millis.unwrap_or(0).to_string(),
            snapshot.failures.len().to_string(),
        ]);
    }
    table
}

fn start_time(snapshot: &SnapshotDescriptor) -> String {
    snapshot
        .start_time_in_millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .or_else(|| snapshot.start_time.clone())
        .unwrap_or_default()
}
