//! Timeouts, retry bounds and default paths used across the tool
//!
//! Grouped by concern so the numbers that shape restore behaviour live in
//! one place.

use std::time::Duration;

/// Index deletion verification
pub mod deletion {
    use super::Duration;

    /// Number of `exists` checks after a delete before giving up
    pub const MAX_VERIFY_ATTEMPTS: u32 = 30;

    /// Pause between two `exists` checks
    pub const VERIFY_INTERVAL: Duration = Duration::from_secs(1);
}

/// Port-forward tunnel to the search engine service
pub mod tunnel {
    use super::Duration;

    /// Maximum time to wait for the tunnel to report readiness
    pub const READY_TIMEOUT: Duration = Duration::from_secs(30);

    /// Line prefix `kubectl port-forward` prints once the listener is bound
    pub const READY_MARKER: &str = "Forwarding from";
}

/// HTTP client settings for the search engine
pub mod http {
    use super::Duration;

    /// Timeout for establishing a connection through the tunnel
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for short requests. Restores run with no timeout since
    /// `wait_for_completion` can take a long time.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
}

/// Default locations and values
pub mod defaults {
    /// Main configuration file
    pub const CONFIG_PATH: &str = "config/main.toml";

    /// Secrets overlay, merged on top of the main configuration
    pub const SECRETS_PATH: &str = "config/secrets.toml";

    /// Env var holding tracing directives, checked before `RUST_LOG`
    pub const LOG_ENV_VAR: &str = "STS_BACKUP_LOG";

    /// Index pattern used when listing indices for classification
    pub const ALL_INDICES_PATTERN: &str = "*";
}
