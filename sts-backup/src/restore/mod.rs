//! Restore workflow: pause workloads, reset the managed indices, restore a
//! snapshot and bring the workloads back.

pub mod confirm;
pub mod deletion;
pub mod indices;
pub mod orchestrator;

pub use confirm::{is_affirmative, Confirmer, StdinConfirmer};
pub use deletion::IndexDeletionVerifier;
pub use orchestrator::{
    RecordedFailure, RestoreOrchestrator, RestorePhase, RestoreRequest, RestoreRun,
};
