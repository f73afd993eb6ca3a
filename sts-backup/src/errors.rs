//! Error types for the backup tool
//!
//! `RestoreError` classifies every failure the restore workflow can hit, with
//! the index or workload name attached so an operator can act on it.
//! `ConfigError` covers loading and validating the configuration files.

use std::fmt;

/// Failure raised by one phase of the restore workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// Enumerating workloads, indices or snapshots failed
    Discovery { target: String, reason: String },

    /// A scale, rollover or delete call was rejected
    Mutation { target: String, reason: String },

    /// Index still present after the verification bound
    DeletionTimeout { index: String, attempts: u32 },

    /// The operator declined the confirmation prompt
    UserCancelled { reason: String },

    /// Tunnel or other connectivity setup failed
    Dependency { reason: String },

    /// The restore call failed or the snapshot is not restorable
    RestoreFailure { snapshot: String, reason: String },
}

impl RestoreError {
    pub fn discovery(target: impl Into<String>, reason: impl fmt::Display) -> Self {
        RestoreError::Discovery {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    pub fn mutation(target: impl Into<String>, reason: impl fmt::Display) -> Self {
        RestoreError::Mutation {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    pub fn restore_failure(snapshot: impl Into<String>, reason: impl fmt::Display) -> Self {
        RestoreError::RestoreFailure {
            snapshot: snapshot.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_user_cancelled(&self) -> bool {
        matches!(self, RestoreError::UserCancelled { .. })
    }
}

/// One workload that could not be brought back to its original capacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadFailure {
    pub name: String,
    pub reason: String,
}

/// Aggregate of every resume failure in a single resume pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeError {
    pub failures: Vec<WorkloadFailure>,
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    LoadFailed { path: String, reason: String },

    /// Configuration parsing error
    ParseError { path: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::Discovery { target, reason } => {
                write!(f, "Failed to discover {}: {}", target, reason)
            }
            RestoreError::Mutation { target, reason } => {
                write!(f, "Failed to modify {}: {}", target, reason)
            }
            RestoreError::DeletionTimeout { index, attempts } => {
                write!(
                    f,
                    "Timeout waiting for index {} to be deleted after {} attempts",
                    index, attempts
                )
            }
            RestoreError::UserCancelled { reason } => {
                write!(f, "Restore cancelled by user: {}", reason)
            }
            RestoreError::Dependency { reason } => {
                write!(f, "Dependency unavailable: {}", reason)
            }
            RestoreError::RestoreFailure { snapshot, reason } => {
                write!(f, "Failed to restore snapshot '{}': {}", snapshot, reason)
            }
        }
    }
}

impl fmt::Display for WorkloadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

impl fmt::Display for ResumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.failures.iter().map(|w| w.name.as_str()).collect();
        write!(
            f,
            "Failed to resume {} workload(s): {}",
            self.failures.len(),
            names.join(", ")
        )
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::ParseError { path, reason } => {
                write!(f, "Failed to parse config '{}': {}", path, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for RestoreError {}
impl std::error::Error for WorkloadFailure {}
impl std::error::Error for ResumeError {}
impl std::error::Error for ConfigError {}
