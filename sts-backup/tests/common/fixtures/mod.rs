//! Reusable test utilities:
//! - In-memory search engine and workload platform doubles
//! - Scripted confirmation answers
//! - Mock Elasticsearch HTTP server
//! - Common test data

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_confirmer;
pub mod mock_elasticsearch;
pub mod mock_search;
pub mod mock_workloads;
pub mod test_data;

pub use mock_confirmer::ScriptedConfirmer;
pub use mock_elasticsearch::MockElasticsearchServer;
pub use mock_search::MockSearchEngine;
pub use mock_workloads::MockWorkloads;
pub use test_data::*;

use std::sync::{Arc, Mutex};

/// Ordered record of calls across several doubles
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    /// Position of the first event equal to `event`
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    /// Position of the last event starting with `prefix`
    pub fn last_position(&self, prefix: &str) -> Option<usize> {
        self.events().iter().rposition(|e| e.starts_with(prefix))
    }
}
