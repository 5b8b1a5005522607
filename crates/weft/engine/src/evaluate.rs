//! External plan-evaluation hook.
//!
//! The hook may change the risk assessment (and through it the guard
//! decision) but never the plan. Any failure makes the engine fall back to
//! the local deterministic assessor, so the hardened path is always
//! available.

use async_trait::async_trait;
use thiserror::Error;
use weft_inventory::InventoryStore;
use weft_mcp::McpClient;
use weft_planner::RiskAssessment;
use weft_types::ChangePlan;

/// Failure of an external evaluation attempt.
#[derive(Debug, Error)]
#[error("plan evaluation failed: {0}")]
pub struct EvaluationError(pub String);

/// Something that can substitute its judgment for the local risk heuristic.
#[async_trait]
pub trait PlanEvaluator: Send + Sync {
    async fn evaluate_plan(
        &self,
        plan: &ChangePlan,
        inventory: &InventoryStore,
    ) -> Result<RiskAssessment, EvaluationError>;
}

#[async_trait]
impl PlanEvaluator for McpClient {
    async fn evaluate_plan(
        &self,
        plan: &ChangePlan,
        inventory: &InventoryStore,
    ) -> Result<RiskAssessment, EvaluationError> {
        McpClient::evaluate_plan(self, plan, inventory)
            .await
            .map_err(|e| EvaluationError(e.to_string()))
    }
}
