pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod operations;
pub mod output;
pub mod restore;
pub mod search;
pub mod tunnel;
pub mod types;
pub mod workloads;

// Re-export commonly used types
pub use config::{Config, ConfigManager};
pub use errors::{ConfigError, RestoreError, ResumeError, WorkloadFailure};
pub use restore::{RestoreOrchestrator, RestorePhase, RestoreRequest, RestoreRun};
pub use search::{ElasticsearchClient, SearchEngine};
pub use workloads::{KubectlWorkloads, WorkloadLifecycle, WorkloadScaler};
