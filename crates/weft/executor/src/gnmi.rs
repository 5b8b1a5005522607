//! gNMI-shaped plan executor.
//!
//! No gNMI library is imported here. The executor drives a narrow client
//! interface, so any model-driven implementation can plug in behind it
//! (TLS, credentials, and per-vendor quirks live in the factory).
//!
//! Per device in the plan: read the pre-snapshot for exactly the paths
//! about to change, apply the updates, then read the same paths back as
//! observed state.

use crate::error::{ExecutorError, Result, TransportError};
use crate::snapshot::{collect_paths_observed, collect_paths_snapshot};
use crate::{ExecutorConfig, PlanApplication, PlanExecutor};
use async_trait::async_trait;
use std::sync::Arc;
use weft_types::{ChangePlan, DeviceState, FabricState, ModelPaths};

/// Minimal model-driven client interface, kept narrow for testability.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Read device state for a list of model paths. Paths the device does
    /// not have are omitted from the result, not returned as null.
    async fn get(&self, paths: &[String]) -> std::result::Result<DeviceState, TransportError>;

    /// Apply updates for model paths.
    async fn set_update(&self, updates: &ModelPaths) -> std::result::Result<(), TransportError>;
}

/// Creates a client for a device name.
///
/// Decouples the executor from transport details; a real factory maps the
/// name to host and port through inventory.
#[async_trait]
pub trait DeviceClientFactory: Send + Sync {
    async fn for_device(&self, device: &str)
        -> std::result::Result<Arc<dyn DeviceClient>, TransportError>;
}

/// Plan executor over the model-driven client seam.
pub struct GnmiExecutor {
    factory: Arc<dyn DeviceClientFactory>,
    config: ExecutorConfig,
}

impl GnmiExecutor {
    pub fn new(factory: Arc<dyn DeviceClientFactory>) -> Self {
        Self {
            factory,
            config: ExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }
}

/// Merge freshly read priors into the snapshot without clobbering values
/// captured by an earlier action; the first read before any write wins.
fn merge_snapshot(snapshot: &mut FabricState, device: &str, before: DeviceState) {
    let device_snapshot = snapshot.entry(device.to_string()).or_default();
    for (path, value) in before {
        device_snapshot.entry(path).or_insert(value);
    }
}

#[async_trait]
impl PlanExecutor for GnmiExecutor {
    async fn apply_plan(&self, plan: &ChangePlan) -> Result<PlanApplication> {
        let mut observed = FabricState::new();
        let mut pre_snapshot = FabricState::new();

        for action in &plan.actions {
            let device = action.device.as_str();
            let paths: Vec<String> = action.model_paths.keys().cloned().collect();

            let client = self
                .factory
                .for_device(device)
                .await
                .map_err(|e| ExecutorError::new(e.0.clone(), pre_snapshot.clone()))?;

            let before = collect_paths_snapshot(client.as_ref(), &paths)
                .await
                .map_err(|e| ExecutorError::new(e.0.clone(), pre_snapshot.clone()))?;
            merge_snapshot(&mut pre_snapshot, device, before);

            client
                .set_update(&action.model_paths)
                .await
                .map_err(|e| ExecutorError::new(e.0.clone(), pre_snapshot.clone()))?;

            let after = if self.config.read_after_write {
                collect_paths_observed(client.as_ref(), &paths)
                    .await
                    .map_err(|e| ExecutorError::new(e.0.clone(), pre_snapshot.clone()))?
            } else {
                action.model_paths.clone()
            };

            let device_observed = observed.entry(device.to_string()).or_default();
            for (path, value) in after {
                device_observed.insert(path, value);
            }

            tracing::debug!(device, paths = paths.len(), "applied action");
        }

        Ok(PlanApplication {
            observed,
            pre_snapshot,
        })
    }
}
