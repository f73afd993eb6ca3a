use anyhow::{anyhow, Result};
use tracing::info;

use super::CommandContext;
use crate::output::{Formatter, Table};
use crate::search::SearchEngine;
use crate::types::IndexInfo;

const HEADERS: [&str; 11] = [
    "HEALTH",
    "STATUS",
    "INDEX",
    "UUID",
    "PRI",
    "REP",
    "DOCS.COUNT",
    "DOCS.DELETED",
    "STORE.SIZE",
    "PRI.STORE.SIZE",
    "DATASET.SIZE",
];

pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let (tunnel, client) = ctx.connect().await?;

    info!("Fetching Elasticsearch indices...");
    let indices = client.list_indices_detailed().await;
    tunnel.close().await;

    let indices = indices.map_err(|e| anyhow!("Failed to list indices: {}", e))?;

    let mut formatter = Formatter::stdout(ctx.global.output);
    if indices.is_empty() {
        return formatter.print_message("No indices found");
    }
    formatter.print_table(&index_table(&indices))
}

pub fn index_table(indices: &[IndexInfo]) -> Table {
    let mut table = Table::new(&HEADERS);
    for index in indices {
        // Closed indices report no document or size columns
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        table.push_row(vec![
            index.health.clone(),
            index.status.clone(),
            index.index.clone(),
            index.uuid.clone(),
            index.pri.clone(),
            index.rep.clone(),
            optional(&index.docs_count),
            optional(&index.docs_deleted),
            optional(&index.store_size),
            optional(&index.pri_store_size),
            optional(&index.dataset_size),
        ]);
    }
    table
}
