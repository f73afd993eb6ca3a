use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use super::CommandContext;
use crate::restore::{RestoreOrchestrator, RestoreRequest, RestoreRun, StdinConfirmer};

/// Run a full restore through a fresh tunnel.
///
/// The tunnel is opened before any workload is touched, so a connectivity
/// failure leaves the cluster unchanged.
pub async fn execute(ctx: &CommandContext, request: RestoreRequest) -> Result<()> {
    let (tunnel, client) = ctx.connect().await?;

    let orchestrator = RestoreOrchestrator::new(
        Arc::new(client),
        Arc::new(ctx.workloads()),
        Arc::new(StdinConfirmer),
        ctx.config.elasticsearch.restore.clone(),
    );

    let run = orchestrator.run(&request).await;
    tunnel.close().await;

    report(&run)
}

/// Turn a finished run into the command result
pub fn report(run: &RestoreRun) -> Result<()> {
    for line in warning_summary(run) {
        warn!("{}", line);
    }

    match run.fatal_error() {
        Some(error) => Err(error.clone().into()),
        None => {
            info!("✓ Restore completed successfully");
            Ok(())
        }
    }
}

/// Lines describing everything the operator has to follow up on.
///
/// Non-fatal phase warnings come first (a partially paused set means some
/// selected deployments kept writing during the restore), then every
/// deployment that could not be scaled back up.
pub fn warning_summary(run: &RestoreRun) -> Vec<String> {
    let mut lines = Vec::new();

    let warnings = run.warnings();
    if !warnings.is_empty() {
        lines.push(format!("Run finished with {} warning(s):", warnings.len()));
        lines.extend(warnings.iter().map(|warning| format!("  - {}", warning)));
    }

    let resume_failures = run.resume_failures();
    if !resume_failures.is_empty() {
        lines.push(format!(
            "{} deployment(s) could not be scaled back up, restore them manually:",
            resume_failures.len()
        ));
        lines.extend(resume_failures.iter().map(|failure| format!("  - {}", failure)));
    }

    lines
}
