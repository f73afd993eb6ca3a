pub mod kubectl;
pub mod scaler;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Workload;
pub use kubectl::KubectlWorkloads;
pub use scaler::{PauseOutcome, WorkloadScaler};

/// Workload lifecycle operations on the orchestration platform
#[async_trait]
pub trait WorkloadLifecycle: Send + Sync {
    /// Workloads matching a label selector, in platform enumeration order
    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<Workload>>;

    /// Current definition of a single workload
    async fn get_workload(&self, name: &str) -> Result<Workload>;

    async fn set_replicas(&self, name: &str, replicas: u32) -> Result<()>;
}
