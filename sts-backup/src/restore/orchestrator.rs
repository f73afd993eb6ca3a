use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::confirm::{is_affirmative, Confirmer};
use super::deletion::IndexDeletionVerifier;
use super::indices::{has_data_stream_members, select_managed};
use crate::config::RestoreConfig;
use crate::constants::defaults::ALL_INDICES_PATTERN;
use crate::errors::{RestoreError, WorkloadFailure};
use crate::search::SearchEngine;
use crate::types::{SnapshotDescriptor, SnapshotState, WorkloadSnapshot};
use crate::workloads::{WorkloadLifecycle, WorkloadScaler};

const CONFIRMATION_PROMPT: &str = "\nAre you sure you want to delete these indices? (yes/no): ";

/// What the operator asked for on the command line
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub snapshot_name: String,
    pub drop_all_indices: bool,
    pub skip_confirmation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    Init,
    Paused,
    Listed,
    ConfirmPending,
    RolledOver,
    Deleted,
    Restored,
    Resumed,
    Done,
    Failed,
}

impl fmt::Display for RestorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RestorePhase::Init => "init",
            RestorePhase::Paused => "pause",
            RestorePhase::Listed => "list",
            RestorePhase::ConfirmPending => "confirmation",
            RestorePhase::RolledOver => "rollover",
            RestorePhase::Deleted => "delete",
            RestorePhase::Restored => "restore",
            RestorePhase::Resumed => "resume",
            RestorePhase::Done => "done",
            RestorePhase::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedFailure {
    /// Stopped forward progress; the run ends `Failed`
    Fatal {
        phase: RestorePhase,
        error: RestoreError,
    },
    /// Reported, but the run continued
    Warning {
        phase: RestorePhase,
        error: RestoreError,
    },
    /// A workload that was not returned to its original replica count
    Resume(WorkloadFailure),
}

/// State of one orchestration run.
///
/// Once `paused_workloads` is non-empty the resume phase runs exactly once
/// before the run is returned, whatever happened in between.
#[derive(Debug)]
pub struct RestoreRun {
    phase: RestorePhase,
    history: Vec<RestorePhase>,
    paused_workloads: Vec<WorkloadSnapshot>,
    matched_indices: Vec<String>,
    snapshot: Option<SnapshotDescriptor>,
    errors: Vec<RecordedFailure>,
}

impl RestoreRun {
    fn new() -> Self {
        Self {
            phase: RestorePhase::Init,
            history: vec![RestorePhase::Init],
            paused_workloads: Vec::new(),
            matched_indices: Vec::new(),
            snapshot: None,
            errors: Vec::new(),
        }
    }

    fn enter(&mut self, phase: RestorePhase) {
        debug!("Restore phase: {} -> {}", self.phase, phase);
        self.phase = phase;
        self.history.push(phase);
    }

    fn record_fatal(&mut self, phase: RestorePhase, error: RestoreError) {
        self.errors.push(RecordedFailure::Fatal { phase, error });
    }

    fn finish(&mut self) {
        let terminal = if self.fatal_error().is_some() {
            RestorePhase::Failed
        } else {
            RestorePhase::Done
        };
        self.enter(terminal);
    }

    pub fn phase(&self) -> RestorePhase {
        self.phase
    }

    /// Every phase entered, in order, starting with `Init`
    pub fn history(&self) -> &[RestorePhase] {
        &self.history
    }

    pub fn paused_workloads(&self) -> &[WorkloadSnapshot] {
        &self.paused_workloads
    }

    pub fn matched_indices(&self) -> &[String] {
        &self.matched_indices
    }

    pub fn snapshot(&self) -> Option<&SnapshotDescriptor> {
        self.snapshot.as_ref()
    }

    pub fn errors(&self) -> &[RecordedFailure] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.phase == RestorePhase::Done
    }

    /// The error that stopped the run, if any
    pub fn fatal_error(&self) -> Option<&RestoreError> {
        self.errors.iter().find_map(|failure| match failure {
            RecordedFailure::Fatal { error, .. } => Some(error),
            _ => None,
        })
    }

    pub fn resume_failures(&self) -> Vec<&WorkloadFailure> {
        self.errors
            .iter()
            .filter_map(|failure| match failure {
                RecordedFailure::Resume(workload) => Some(workload),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<&RestoreError> {
        self.errors
            .iter()
            .filter_map(|failure| match failure {
                RecordedFailure::Warning { error, .. } => Some(error),
                _ => None,
            })
            .collect()
    }
}

struct PhaseFailure {
    phase: RestorePhase,
    error: RestoreError,
}

impl PhaseFailure {
    fn new(phase: RestorePhase, error: RestoreError) -> Self {
        Self { phase, error }
    }
}

/// Sequences pause, index reset, snapshot restore and resume.
pub struct RestoreOrchestrator {
    search: Arc<dyn SearchEngine>,
    scaler: WorkloadScaler,
    deleter: IndexDeletionVerifier,
    confirmer: Arc<dyn Confirmer>,
    settings: RestoreConfig,
}

impl RestoreOrchestrator {
    pub fn new(
        search: Arc<dyn SearchEngine>,
        workloads: Arc<dyn WorkloadLifecycle>,
        confirmer: Arc<dyn Confirmer>,
        settings: RestoreConfig,
    ) -> Self {
        Self {
            deleter: IndexDeletionVerifier::with_defaults(search.clone()),
            scaler: WorkloadScaler::new(workloads),
            search,
            confirmer,
            settings,
        }
    }

    /// Override the index deletion verification bound
    pub fn with_deletion_policy(mut self, max_attempts: u32, interval: Duration) -> Self {
        self.deleter = IndexDeletionVerifier::new(self.search.clone(), max_attempts, interval);
        self
    }

    /// Execute one restore run.
    ///
    /// Never returns early once a workload has been paused: the resume phase
    /// runs after the forward phases whether they succeed, fail or panic.
    pub async fn run(&self, request: &RestoreRequest) -> RestoreRun {
        let mut run = RestoreRun::new();

        if !self.pause(&mut run).await {
            run.finish();
            return run;
        }

        let forward = AssertUnwindSafe(self.forward_phases(&mut run, request))
            .catch_unwind()
            .await;

        if let Ok(Err(failure)) = &forward {
            run.record_fatal(failure.phase, failure.error.clone());
        }

        if !run.paused_workloads.is_empty() {
            self.resume(&mut run).await;
        }

        if let Err(panic) = forward {
            std::panic::resume_unwind(panic);
        }

        run.finish();
        run
    }

    /// Returns false when the run cannot continue.
    async fn pause(&self, run: &mut RestoreRun) -> bool {
        let selector = &self.settings.scale_down_label_selector;
        info!("Scaling down deployments (selector: {})...", selector);

        let outcome = self.scaler.pause_matching(selector).await;
        run.paused_workloads.extend(outcome.snapshots);

        if let Some(error) = outcome.error {
            if run.paused_workloads.is_empty() {
                run.record_fatal(RestorePhase::Paused, error);
                return false;
            }
            warn!("Continuing with partially paused workloads: {}", error);
            run.errors.push(RecordedFailure::Warning {
                phase: RestorePhase::Paused,
                error,
            });
        }

        if run.paused_workloads.is_empty() {
            info!("No deployments found to scale down");
        } else {
            info!("✓ Scaled down {} deployment(s):", run.paused_workloads.len());
            for workload in &run.paused_workloads {
                info!("  - {} (replicas: {} -> 0)", workload.name, workload.original_replicas);
            }
        }

        run.enter(RestorePhase::Paused);
        true
    }

    async fn forward_phases(
        &self,
        run: &mut RestoreRun,
        request: &RestoreRequest,
    ) -> Result<(), PhaseFailure> {
        self.list(run, request).await?;

        if request.drop_all_indices {
            if run.matched_indices.is_empty() {
                info!("No managed indices found to delete");
            } else {
                self.reset_managed_indices(run, request).await?;
            }
        }

        info!(
            "Restoring snapshot '{}' from repository '{}'",
            request.snapshot_name, self.settings.repository
        );
        debug!("Indices pattern: {}", self.settings.indices_pattern);
        info!("Starting restore - this may take several minutes...");

        self.search
            .restore_snapshot(
                &self.settings.repository,
                &request.snapshot_name,
                &self.settings.indices_pattern,
                true,
            )
            .await
            .map_err(|e| {
                PhaseFailure::new(
                    RestorePhase::Restored,
                    RestoreError::restore_failure(&request.snapshot_name, e),
                )
            })?;

        run.enter(RestorePhase::Restored);
        info!("✓ Snapshot {} restored", request.snapshot_name);
        Ok(())
    }

    async fn list(&self, run: &mut RestoreRun, request: &RestoreRequest) -> Result<(), PhaseFailure> {
        let listed = |error| PhaseFailure::new(RestorePhase::Listed, error);

        info!("Fetching current Elasticsearch indices...");
        let all_indices = self
            .search
            .list_indices(ALL_INDICES_PATTERN)
            .await
            .map_err(|e| listed(RestoreError::discovery("indices", e)))?;

        run.matched_indices = select_managed(
            &all_indices,
            &self.settings.index_prefix,
            &self.settings.datastream_index_prefix,
        );
        debug!(
            "{} of {} index(es) belong to the managed dataset",
            run.matched_indices.len(),
            all_indices.len()
        );

        let snapshot = self
            .search
            .get_snapshot(&self.settings.repository, &request.snapshot_name)
            .await
            .map_err(|e| listed(RestoreError::restore_failure(&request.snapshot_name, e)))?;

        match snapshot.state {
            SnapshotState::Success => {}
            SnapshotState::Partial => {
                warn!(
                    "Snapshot '{}' is PARTIAL, some indices may be missing",
                    snapshot.name
                );
            }
            state => {
                return Err(listed(RestoreError::restore_failure(
                    &request.snapshot_name,
                    format!("snapshot state is {}", state),
                )));
            }
        }

        if snapshot.indices.is_empty() {
            warn!("Snapshot contains no indices");
        } else {
            info!("Snapshot contains {} index(es)", snapshot.indices.len());
            for index in &snapshot.indices {
                debug!("  - {}", index);
            }
        }

        run.snapshot = Some(snapshot);
        run.enter(RestorePhase::Listed);
        Ok(())
    }

    async fn reset_managed_indices(
        &self,
        run: &mut RestoreRun,
        request: &RestoreRequest,
    ) -> Result<(), PhaseFailure> {
        run.enter(RestorePhase::ConfirmPending);

        info!("Found {} managed index(es) to delete", run.matched_indices.len());
        for index in &run.matched_indices {
            info!("  - {}", index);
        }

        if !request.skip_confirmation {
            let cancelled = |reason: String| {
                PhaseFailure::new(
                    RestorePhase::ConfirmPending,
                    RestoreError::UserCancelled { reason },
                )
            };

            let answer = self
                .confirmer
                .read_answer(CONFIRMATION_PROMPT)
                .await
                .map_err(|e| cancelled(e.to_string()))?;

            if !is_affirmative(&answer) {
                return Err(cancelled(format!(
                    "confirmation declined (answer: '{}')",
                    answer.trim()
                )));
            }
        }

        if has_data_stream_members(&run.matched_indices, &self.settings.datastream_index_prefix) {
            let stream = &self.settings.datastream_name;
            info!("Rolling over datastream '{}'...", stream);
            self.search.rollover_data_stream(stream).await.map_err(|e| {
                PhaseFailure::new(
                    RestorePhase::RolledOver,
                    RestoreError::mutation(format!("data stream {}", stream), e),
                )
            })?;
            info!("✓ Datastream rolled over successfully");
        }
        run.enter(RestorePhase::RolledOver);

        info!("Deleting {} index(es)...", run.matched_indices.len());
        for index in &run.matched_indices {
            self.deleter
                .delete_and_verify(index)
                .await
                .map_err(|e| PhaseFailure::new(RestorePhase::Deleted, e))?;
        }
        run.enter(RestorePhase::Deleted);
        info!("✓ All indices deleted successfully");
        Ok(())
    }

    async fn resume(&self, run: &mut RestoreRun) {
        info!("Scaling up deployments back to original replica counts...");

        match self.scaler.resume(&run.paused_workloads).await {
            Ok(()) => {
                info!(
                    "✓ Scaled up {} deployment(s) successfully",
                    run.paused_workloads.len()
                );
            }
            Err(e) => {
                warn!("{}", e);
                run.errors
                    .extend(e.failures.into_iter().map(RecordedFailure::Resume));
            }
        }

        run.enter(RestorePhase::Resumed);
    }
}
