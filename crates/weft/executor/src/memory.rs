//! In-memory executor for tests and local simulation.
//!
//! Behaves like a device state database keyed by device name and model
//! path. A mismatch map can override returned observed values to simulate
//! a device that rejected config or never converged.

use crate::error::Result;
use crate::{PlanApplication, PlanExecutor};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use weft_types::{ChangePlan, FabricState};

/// Executor over an internal `device -> path -> value` map.
#[derive(Debug, Default)]
pub struct InMemoryExecutor {
    state: Mutex<FabricState>,
    mismatch: FabricState,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observed state for the mismatch devices reports these values instead
    /// of the written ones; internal state still receives the writes.
    pub fn with_mismatch(mismatch: FabricState) -> Self {
        Self {
            state: Mutex::new(FabricState::new()),
            mismatch,
        }
    }

    /// Seed internal state before any plan is applied.
    pub async fn seed(&self, device: &str, path: &str, value: Value) {
        let mut state = self.state.lock().await;
        state
            .entry(device.to_string())
            .or_default()
            .insert(path.to_string(), value);
    }

    /// Snapshot of the internal state, for assertions.
    pub async fn state(&self) -> FabricState {
        self.state.lock().await.clone()
    }

    /// Current value of one path, for assertions.
    pub async fn value(&self, device: &str, path: &str) -> Option<Value> {
        self.state
            .lock()
            .await
            .get(device)
            .and_then(|d| d.get(path))
            .cloned()
    }
}

#[async_trait]
impl PlanExecutor for InMemoryExecutor {
    async fn apply_plan(&self, plan: &ChangePlan) -> Result<PlanApplication> {
        let mut state = self.state.lock().await;
        let mut observed = FabricState::new();
        let mut pre_snapshot = FabricState::new();

        for action in &plan.actions {
            let device_state = state.entry(action.device.clone()).or_default();
            let device_pre = pre_snapshot.entry(action.device.clone()).or_default();
            let device_obs = observed.entry(action.device.clone()).or_default();

            // Capture priors first; a path the device never had stays absent.
            for path in action.model_paths.keys() {
                if let Some(prior) = device_state.get(path) {
                    device_pre.entry(path.clone()).or_insert_with(|| prior.clone());
                }
            }

            for (path, value) in &action.model_paths {
                device_state.insert(path.clone(), value.clone());
            }

            for path in action.model_paths.keys() {
                if let Some(value) = device_state.get(path) {
                    device_obs.insert(path.clone(), value.clone());
                }
            }

            if let Some(overrides) = self.mismatch.get(&action.device) {
                for (path, bad_value) in overrides {
                    device_obs.insert(path.clone(), bad_value.clone());
                }
            }
        }

        Ok(PlanApplication {
            observed,
            pre_snapshot,
        })
    }
}
