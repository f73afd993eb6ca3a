use std::sync::Arc;
use tracing::{info, warn};

use super::WorkloadLifecycle;
use crate::errors::{RestoreError, ResumeError, WorkloadFailure};
use crate::types::WorkloadSnapshot;

/// Result of a pause pass.
///
/// `snapshots` holds every workload whose replica count was captured, even
/// when `error` is set: those workloads may already be scaled to zero and
/// must still be handed to [`WorkloadScaler::resume`].
#[derive(Debug)]
pub struct PauseOutcome {
    pub snapshots: Vec<WorkloadSnapshot>,
    pub error: Option<RestoreError>,
}

/// Pauses and resumes workloads selected by label
pub struct WorkloadScaler {
    lifecycle: Arc<dyn WorkloadLifecycle>,
}

impl WorkloadScaler {
    pub fn new(lifecycle: Arc<dyn WorkloadLifecycle>) -> Self {
        Self { lifecycle }
    }

    /// Scale every workload matching `selector` to zero, recording its
    /// original replica count first. Stops at the first rejected update.
    pub async fn pause_matching(&self, selector: &str) -> PauseOutcome {
        let workloads = match self.lifecycle.list_workloads(selector).await {
            Ok(workloads) => workloads,
            Err(e) => {
                return PauseOutcome {
                    snapshots: Vec::new(),
                    error: Some(RestoreError::discovery(
                        format!("workloads matching '{}'", selector),
                        e,
                    )),
                }
            }
        };

        let mut snapshots = Vec::with_capacity(workloads.len());

        for workload in workloads {
            snapshots.push(WorkloadSnapshot {
                name: workload.name.clone(),
                original_replicas: workload.replicas,
            });

            if workload.replicas == 0 {
                continue;
            }

            if let Err(e) = self.lifecycle.set_replicas(&workload.name, 0).await {
                return PauseOutcome {
                    snapshots,
                    error: Some(RestoreError::mutation(
                        format!("workload {}", workload.name),
                        e,
                    )),
                };
            }
        }

        PauseOutcome {
            snapshots,
            error: None,
        }
    }

    /// Restore every snapshot to its original replica count.
    ///
    /// Each workload is re-fetched before the update. A failure on one
    /// workload does not stop the others; all failures are returned together.
    pub async fn resume(&self, snapshots: &[WorkloadSnapshot]) -> Result<(), ResumeError> {
        let mut failures = Vec::new();

        for snapshot in snapshots {
            let current = match self.lifecycle.get_workload(&snapshot.name).await {
                Ok(current) => current,
                Err(e) => {
                    warn!("Failed to get workload {}: {}", snapshot.name, e);
                    failures.push(WorkloadFailure {
                        name: snapshot.name.clone(),
                        reason: format!("failed to get workload: {}", e),
                    });
                    continue;
                }
            };

            if let Err(e) = self
                .lifecycle
                .set_replicas(&snapshot.name, snapshot.original_replicas)
                .await
            {
                warn!("Failed to scale up workload {}: {}", snapshot.name, e);
                failures.push(WorkloadFailure {
                    name: snapshot.name.clone(),
                    reason: format!("failed to scale up: {}", e),
                });
                continue;
            }

            info!(
                "  - {} (replicas: {} -> {})",
                snapshot.name, current.replicas, snapshot.original_replicas
            );
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ResumeError { failures })
        }
    }
}
