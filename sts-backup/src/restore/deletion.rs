use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::constants::deletion::{MAX_VERIFY_ATTEMPTS, VERIFY_INTERVAL};
use crate::errors::RestoreError;
use crate::search::SearchEngine;

/// Deletes an index and polls until the engine stops reporting it.
///
/// A delete acknowledgment does not mean the index is already gone from
/// subsequent reads, so absence is confirmed with a bounded number of
/// `exists` checks.
pub struct IndexDeletionVerifier {
    search: Arc<dyn SearchEngine>,
    max_attempts: u32,
    interval: Duration,
}

impl IndexDeletionVerifier {
    pub fn new(search: Arc<dyn SearchEngine>, max_attempts: u32, interval: Duration) -> Self {
        Self {
            search,
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    pub fn with_defaults(search: Arc<dyn SearchEngine>) -> Self {
        Self::new(search, MAX_VERIFY_ATTEMPTS, VERIFY_INTERVAL)
    }

    /// Delete `index` and wait for it to disappear.
    ///
    /// A rejected delete is returned at once without retry. Up to
    /// `max_attempts` existence checks follow, `interval` apart.
    pub async fn delete_and_verify(&self, index: &str) -> Result<(), RestoreError> {
        info!("  Deleting index: {}", index);
        self.search
            .delete_index(index)
            .await
            .map_err(|e| RestoreError::mutation(format!("index {}", index), e))?;

        for attempt in 1..=self.max_attempts {
            let exists = self
                .search
                .index_exists(index)
                .await
                .map_err(|e| RestoreError::discovery(format!("index {}", index), e))?;

            if !exists {
                debug!("Index successfully deleted: {} (check {})", index, attempt);
                return Ok(());
            }

            if attempt < self.max_attempts {
                sleep(self.interval).await;
            }
        }

        Err(RestoreError::DeletionTimeout {
            index: index.to_string(),
            attempts: self.max_attempts,
        })
    }
}
