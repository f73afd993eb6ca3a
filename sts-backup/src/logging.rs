use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::defaults::LOG_ENV_VAR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    /// `--debug` wins over `--quiet`
    pub fn from_flags(debug: bool, quiet: bool) -> Self {
        if debug {
            Verbosity::Debug
        } else if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }

    pub fn default_level(self) -> Level {
        match self {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
        }
    }
}

/// Install the global subscriber. Logs go to stderr; stdout is reserved for
/// command output.
pub fn init_tracing(verbosity: Verbosity) -> Result<()> {
    let filter = build_env_filter(verbosity)?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

// STS_BACKUP_LOG, then RUST_LOG, then the flag-derived level.
fn build_env_filter(verbosity: Verbosity) -> Result<EnvFilter> {
    if let Ok(directives) = std::env::var(LOG_ENV_VAR) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return Ok(filter);
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let filter = EnvFilter::new(verbosity.default_level().as_str());
    if verbosity == Verbosity::Quiet {
        return Ok(filter);
    }

    Ok(filter
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?))
}
