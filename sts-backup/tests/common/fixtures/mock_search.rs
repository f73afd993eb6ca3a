//! In-memory search engine
//!
//! Every call is recorded in the shared [`EventLog`] as `<operation>:<target>`.
//! Failures and index disappearance delays are configured per test.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use sts_backup::search::SearchEngine;
use sts_backup::types::{IndexInfo, RepositorySettings, SlmPolicy, SnapshotDescriptor};

use super::EventLog;

#[derive(Default)]
struct State {
    indices: Vec<String>,
    snapshots: Vec<SnapshotDescriptor>,
    // Number of `exists` checks that still report the index after deletion.
    // Missing entry: gone on the first check. `None`: never disappears.
    lingering: HashMap<String, Option<u32>>,
    deleted: HashSet<String>,
    fail_list_indices: Option<String>,
    fail_delete: HashMap<String, String>,
    fail_exists: HashMap<String, String>,
    fail_rollover: Option<String>,
    fail_restore: Option<String>,
    panic_on_restore: bool,
}

pub struct MockSearchEngine {
    state: Mutex<State>,
    pub log: EventLog,
}

impl MockSearchEngine {
    pub fn new(log: EventLog) -> Self {
        Self {
            state: Mutex::new(State::default()),
            log,
        }
    }

    pub fn with_indices(self, indices: &[&str]) -> Self {
        self.state.lock().unwrap().indices = indices.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_snapshot(self, snapshot: SnapshotDescriptor) -> Self {
        self.state.lock().unwrap().snapshots.push(snapshot);
        self
    }

    /// Index keeps showing up for `checks` existence checks after deletion
    pub fn lingering_for(self, index: &str, checks: u32) -> Self {
        self.state
            .lock()
            .unwrap()
            .lingering
            .insert(index.to_string(), Some(checks));
        self
    }

    /// Index never disappears after deletion
    pub fn never_disappears(self, index: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .lingering
            .insert(index.to_string(), None);
        self
    }

    pub fn failing_list_indices(self, reason: &str) -> Self {
        self.state.lock().unwrap().fail_list_indices = Some(reason.to_string());
        self
    }

    pub fn failing_delete(self, index: &str, reason: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_delete
            .insert(index.to_string(), reason.to_string());
        self
    }

    pub fn failing_exists(self, index: &str, reason: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_exists
            .insert(index.to_string(), reason.to_string());
        self
    }

    pub fn failing_rollover(self, reason: &str) -> Self {
        self.state.lock().unwrap().fail_rollover = Some(reason.to_string());
        self
    }

    pub fn failing_restore(self, reason: &str) -> Self {
        self.state.lock().unwrap().fail_restore = Some(reason.to_string());
        self
    }

    pub fn panicking_restore(self) -> Self {
        self.state.lock().unwrap().panic_on_restore = true;
        self
    }

    pub fn deleted_indices(&self) -> Vec<String> {
        let mut deleted: Vec<String> = self.state.lock().unwrap().deleted.iter().cloned().collect();
        deleted.sort();
        deleted
    }
}

#[async_trait]
impl SearchEngine for MockSearchEngine {
    async fn list_snapshots(&self, repository: &str) -> Result<Vec<SnapshotDescriptor>> {
        self.log.push(format!("list_snapshots:{}", repository));
        Ok(self.state.lock().unwrap().snapshots.clone())
    }

    async fn get_snapshot(&self, repository: &str, name: &str) -> Result<SnapshotDescriptor> {
        self.log.push(format!("get_snapshot:{}", name));
        self.state
            .lock()
            .unwrap()
            .snapshots
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| anyhow!("snapshot {} not found in repository {}", name, repository))
    }

    async fn restore_snapshot(
        &self,
        _repository: &str,
        name: &str,
        _indices_pattern: &str,
        _wait_for_completion: bool,
    ) -> Result<()> {
        self.log.push(format!("restore:{}", name));
        let (panic_on_restore, failure) = {
            let state = self.state.lock().unwrap();
            (state.panic_on_restore, state.fail_restore.clone())
        };
        if panic_on_restore {
            panic!("restore blew up");
        }
        match failure {
            Some(reason) => Err(anyhow!(reason)),
            None => Ok(()),
        }
    }

    async fn list_indices(&self, pattern: &str) -> Result<Vec<String>> {
        self.log.push(format!("list_indices:{}", pattern));
        let state = self.state.lock().unwrap();
        if let Some(reason) = &state.fail_list_indices {
            return Err(anyhow!(reason.clone()));
        }
        Ok(state.indices.clone())
    }

    async fn list_indices_detailed(&self) -> Result<Vec<IndexInfo>> {
        self.log.push("list_indices_detailed");
        let state = self.state.lock().unwrap();
        Ok(state
            .indices
            .iter()
            .map(|index| IndexInfo {
                index: index.clone(),
                ..IndexInfo::default()
            })
            .collect())
    }

    async fn delete_index(&self, index: &str) -> Result<()> {
        self.log.push(format!("delete:{}", index));
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.fail_delete.get(index) {
            return Err(anyhow!(reason.clone()));
        }
        state.deleted.insert(index.to_string());
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        self.log.push(format!("exists:{}", index));
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.fail_exists.get(index) {
            return Err(anyhow!(reason.clone()));
        }
        if !state.deleted.contains(index) {
            return Ok(state.indices.iter().any(|i| i == index));
        }
        match state.lingering.get_mut(index) {
            None => Ok(false),
            Some(None) => Ok(true),
            Some(Some(0)) => Ok(false),
            Some(Some(remaining)) => {
                *remaining -= 1;
                Ok(true)
            }
        }
    }

    async fn rollover_data_stream(&self, name: &str) -> Result<()> {
        self.log.push(format!("rollover:{}", name));
        match &self.state.lock().unwrap().fail_rollover {
            Some(reason) => Err(anyhow!(reason.clone())),
            None => Ok(()),
        }
    }

    async fn configure_snapshot_repository(&self, settings: &RepositorySettings) -> Result<()> {
        self.log.push(format!("configure_repository:{}", settings.name));
        Ok(())
    }

    async fn configure_slm_policy(&self, policy: &SlmPolicy) -> Result<()> {
        self.log.push(format!("configure_slm:{}", policy.name));
        Ok(())
    }
}
