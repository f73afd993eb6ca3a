//! In-memory workload platform
//!
//! Holds the live replica count of each workload so tests can assert the
//! final state after a run. Calls are recorded as `scale:<name>:<replicas>`,
//! `get:<name>` and `list_workloads`.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use sts_backup::types::Workload;
use sts_backup::workloads::WorkloadLifecycle;

use super::EventLog;

#[derive(Default)]
struct State {
    workloads: Vec<Workload>,
    fail_list: Option<String>,
    fail_get: HashSet<String>,
    // (name, replicas) pairs whose scale call is rejected
    fail_scale: HashSet<(String, u32)>,
}

pub struct MockWorkloads {
    state: Mutex<State>,
    pub log: EventLog,
}

impl MockWorkloads {
    pub fn new(log: EventLog) -> Self {
        Self {
            state: Mutex::new(State::default()),
            log,
        }
    }

    pub fn with_workload(self, name: &str, replicas: u32) -> Self {
        self.state.lock().unwrap().workloads.push(Workload {
            name: name.to_string(),
            replicas,
        });
        self
    }

    pub fn failing_list(self, reason: &str) -> Self {
        self.state.lock().unwrap().fail_list = Some(reason.to_string());
        self
    }

    pub fn failing_get(self, name: &str) -> Self {
        self.state.lock().unwrap().fail_get.insert(name.to_string());
        self
    }

    /// Reject scaling `name` to `replicas`
    pub fn failing_scale(self, name: &str, replicas: u32) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_scale
            .insert((name.to_string(), replicas));
        self
    }

    pub fn replicas(&self, name: &str) -> Option<u32> {
        self.state
            .lock()
            .unwrap()
            .workloads
            .iter()
            .find(|w| w.name == name)
            .map(|w| w.replicas)
    }
}

#[async_trait]
impl WorkloadLifecycle for MockWorkloads {
    async fn list_workloads(&self, _label_selector: &str) -> Result<Vec<Workload>> {
        self.log.push("list_workloads");
        let state = self.state.lock().unwrap();
        match &state.fail_list {
            Some(reason) => Err(anyhow!(reason.clone())),
            None => Ok(state.workloads.clone()),
        }
    }

    async fn get_workload(&self, name: &str) -> Result<Workload> {
        self.log.push(format!("get:{}", name));
        let state = self.state.lock().unwrap();
        if state.fail_get.contains(name) {
            return Err(anyhow!("deployments.apps \"{}\" not found", name));
        }
        state
            .workloads
            .iter()
            .find(|w| w.name == name)
            .cloned()
            .ok_or_else(|| anyhow!("deployments.apps \"{}\" not found", name))
    }

    async fn set_replicas(&self, name: &str, replicas: u32) -> Result<()> {
        self.log.push(format!("scale:{}:{}", name, replicas));
        let mut state = self.state.lock().unwrap();
        if state.fail_scale.contains(&(name.to_string(), replicas)) {
            return Err(anyhow!("scale of {} to {} rejected", name, replicas));
        }
        match state.workloads.iter_mut().find(|w| w.name == name) {
            Some(workload) => {
                workload.replicas = replicas;
                Ok(())
            }
            None => Err(anyhow!("deployments.apps \"{}\" not found", name)),
        }
    }
}
