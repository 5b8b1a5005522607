//! Continuous runner: the loop that turns the engine into a running system.
//!
//! Each cycle loads inventory, validates the fabric, fetches intents, and
//! runs them one at a time. A fabric that fails validation blocks every
//! intent in that cycle; a broken fabric is never a reason to push more
//! config at it.

use crate::engine::{OrchestrationEngine, RunResult};
use crate::intent::{IntentSource, IntentSourceError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use weft_fabric::{build_fabric_graph, validate_clos_topology, validate_external_connectivity};
use weft_inventory::{InventoryError, InventorySource};

/// Runner configuration.
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    pub interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
        }
    }
}

/// Errors that abort a whole cycle before any intent runs.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Intent(#[from] IntentSourceError),
}

/// What one cycle did, for callers and tests.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// False when topology or external-connectivity validation blocked the
    /// cycle; the blocking errors are listed.
    pub topology_ok: bool,
    pub topology_errors: Vec<String>,
    /// `(change_id, result)` for every intent that ran.
    pub results: Vec<(String, RunResult)>,
}

/// Periodic ingest-and-execute loop.
pub struct Runner {
    engine: OrchestrationEngine,
    inventory_source: Arc<dyn InventorySource>,
    intent_source: Arc<dyn IntentSource>,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(
        engine: OrchestrationEngine,
        inventory_source: Arc<dyn InventorySource>,
        intent_source: Arc<dyn IntentSource>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            engine,
            inventory_source,
            intent_source,
            config,
        }
    }

    /// Run cycles until the task is cancelled.
    pub async fn run_forever(&self) {
        loop {
            if let Err(error) = self.run_cycle().await {
                tracing::error!(%error, "cycle failed");
            }
            tokio::time::sleep(self.config.interval).await;
        }
    }

    /// Run a single cycle. Kept separate for unit tests and controlled runs.
    pub async fn run_cycle(&self) -> Result<CycleReport, RunnerError> {
        let inventory = self.inventory_source.load().await?;
        let intents = self.intent_source.fetch().await?;

        let mut report = CycleReport {
            topology_ok: true,
            ..CycleReport::default()
        };

        if intents.is_empty() {
            return Ok(report);
        }

        // Topology gate: a fabric that fails validation blocks the cycle.
        let graph = build_fabric_graph(&inventory);
        let topology = validate_clos_topology(&graph);
        let external = validate_external_connectivity(&graph);
        for warning in topology.warnings.iter().chain(&external.warnings) {
            tracing::warn!(%warning, "fabric validation warning");
        }
        if !topology.ok || !external.ok {
            report.topology_ok = false;
            report.topology_errors =
                topology.errors.into_iter().chain(external.errors).collect();
            for error in &report.topology_errors {
                tracing::error!(%error, "fabric validation error, blocking cycle");
            }
            return Ok(report);
        }

        for intent in intents {
            let result = self.engine.run_once(&intent, &inventory).await;
            if result.ok {
                tracing::info!(change_id = %intent.change_id, "intent ok");
            } else if let Some(alert) = &result.alert {
                tracing::warn!(
                    change_id = %intent.change_id,
                    severity = %alert.severity,
                    summary = %alert.summary,
                    "intent did not complete"
                );
                for failure in &alert.verification_failures {
                    tracing::warn!(change_id = %intent.change_id, %failure, "verification failure");
                }
            } else {
                tracing::warn!(change_id = %intent.change_id, "intent failed with no alert");
            }
            report.results.push((intent.change_id.clone(), result));
        }

        Ok(report)
    }
}
