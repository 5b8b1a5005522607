//! Orchestration engine.
//!
//! Coordinates planning, risk evaluation, guarded execution, verification,
//! rollback, and alert emission for a single intent. The planner stays
//! deterministic; an evaluation hook can enrich risk but never bypasses the
//! guard.

use crate::alert::{Alert, AlertSeverity};
use crate::evaluate::PlanEvaluator;
use std::sync::Arc;
use weft_executor::PlanExecutor;
use weft_guard::{ExecutionGuard, ExecutionMode, GuardDecision};
use weft_inventory::InventoryStore;
use weft_planner::{
    assess_plan_risk, build_rollback_plan, evaluate_verification, Planner, RiskAssessment,
};
use weft_types::{ChangePlan, FabricState, IntentChange};

/// Result of one `run_once`.
#[derive(Debug)]
pub struct RunResult {
    pub ok: bool,
    pub plan: Option<ChangePlan>,
    pub risk: Option<RiskAssessment>,
    pub guard: Option<GuardDecision>,
    pub alert: Option<Alert>,
}

/// The closed-loop engine: plan, assess, guard, execute, verify, roll back.
pub struct OrchestrationEngine {
    planner: Planner,
    executor: Arc<dyn PlanExecutor>,
    guard: ExecutionGuard,
    evaluator: Option<Arc<dyn PlanEvaluator>>,
}

impl OrchestrationEngine {
    pub fn new(planner: Planner, executor: Arc<dyn PlanExecutor>) -> Self {
        Self {
            planner,
            executor,
            guard: ExecutionGuard::default(),
            evaluator: None,
        }
    }

    pub fn with_guard(mut self, guard: ExecutionGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Attach an external evaluation hook. The local assessor remains the
    /// fallback for every hook failure.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn PlanEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Execute a single intent change end to end.
    pub async fn run_once(&self, intent: &IntentChange, inventory: &InventoryStore) -> RunResult {
        let plan = match self.planner.plan_change(intent, inventory) {
            Ok(plan) => plan,
            Err(error) => {
                tracing::warn!(change_id = %intent.change_id, %error, "intent rejected by planner");
                let mut alert = Alert::new(
                    AlertSeverity::Warning,
                    format!("intent rejected by planner: {error}"),
                );
                alert.plan_id = Some(intent.change_id.clone());
                return RunResult {
                    ok: false,
                    plan: None,
                    risk: None,
                    guard: None,
                    alert: Some(alert),
                };
            }
        };

        let risk = self.evaluate_risk(&plan, inventory).await;
        let guard = self.guard.decide(&risk);

        match guard.mode {
            ExecutionMode::DryRun => {
                let mut alert = Alert::new(AlertSeverity::Info, "dry run only, plan not applied");
                alert.plan_id = Some(plan.plan_id.clone());
                alert.risk = Some(risk.clone());
                RunResult {
                    ok: false,
                    plan: Some(plan),
                    risk: Some(risk),
                    guard: Some(guard),
                    alert: Some(alert),
                }
            }
            ExecutionMode::Simulate => self.run_simulated(plan, risk, guard),
            ExecutionMode::Apply => self.run_applied(plan, risk, guard).await,
        }
    }

    async fn evaluate_risk(&self, plan: &ChangePlan, inventory: &InventoryStore) -> RiskAssessment {
        if let Some(evaluator) = &self.evaluator {
            match evaluator.evaluate_plan(plan, inventory).await {
                Ok(risk) => return risk,
                Err(error) => {
                    tracing::warn!(
                        plan_id = %plan.plan_id,
                        %error,
                        "external evaluation failed, falling back to local assessor"
                    );
                }
            }
        }
        assess_plan_risk(plan, inventory)
    }

    fn run_simulated(
        &self,
        plan: ChangePlan,
        risk: RiskAssessment,
        guard: GuardDecision,
    ) -> RunResult {
        let observed = simulate_observed_state(&plan);
        let outcome = evaluate_verification(&plan.verification, &observed);

        if outcome.ok {
            return RunResult {
                ok: true,
                plan: Some(plan),
                risk: Some(risk),
                guard: Some(guard),
                alert: None,
            };
        }

        let mut alert = Alert::new(
            AlertSeverity::Warning,
            "simulation verification failed, plan not applied",
        );
        alert.plan_id = Some(plan.plan_id.clone());
        alert.risk = Some(risk.clone());
        alert.verification_failures = outcome.failures;
        alert.evidence = outcome.evidence;
        RunResult {
            ok: false,
            plan: Some(plan),
            risk: Some(risk),
            guard: Some(guard),
            alert: Some(alert),
        }
    }

    async fn run_applied(
        &self,
        plan: ChangePlan,
        risk: RiskAssessment,
        guard: GuardDecision,
    ) -> RunResult {
        let application = match self.executor.apply_plan(&plan).await {
            Ok(application) => application,
            Err(error) => {
                // Whatever snapshot the executor managed to capture is
                // still usable for recovery of partially applied paths.
                let (rollback_attempted, unrecoverable) = if plan.rollback.enabled
                    && !error.pre_snapshot.is_empty()
                {
                    self.attempt_rollback(&plan, &error.pre_snapshot).await
                } else {
                    (false, Vec::new())
                };

                tracing::error!(plan_id = %plan.plan_id, error = %error.message, "plan execution failed");
                let mut alert = Alert::new(
                    AlertSeverity::Critical,
                    format!("execution failed: {}", error.message),
                );
                alert.plan_id = Some(plan.plan_id.clone());
                alert.risk = Some(risk.clone());
                alert.rollback_attempted = rollback_attempted;
                alert.unrecoverable_paths = unrecoverable;
                return RunResult {
                    ok: false,
                    plan: Some(plan),
                    risk: Some(risk),
                    guard: Some(guard),
                    alert: Some(alert),
                };
            }
        };

        let outcome = evaluate_verification(&plan.verification, &application.observed);
        if outcome.ok {
            return RunResult {
                ok: true,
                plan: Some(plan),
                risk: Some(risk),
                guard: Some(guard),
                alert: None,
            };
        }

        let (rollback_attempted, unrecoverable) = if plan.rollback.enabled {
            self.attempt_rollback(&plan, &application.pre_snapshot).await
        } else {
            (false, Vec::new())
        };

        tracing::error!(
            plan_id = %plan.plan_id,
            failures = outcome.failures.len(),
            rollback_attempted,
            "verification failed after apply"
        );

        let mut alert = Alert::new(AlertSeverity::Critical, "verification failed after apply");
        alert.plan_id = Some(plan.plan_id.clone());
        alert.risk = Some(risk.clone());
        alert.verification_failures = outcome.failures;
        alert.evidence = outcome.evidence;
        alert.rollback_attempted = rollback_attempted;
        alert.unrecoverable_paths = unrecoverable;
        RunResult {
            ok: false,
            plan: Some(plan),
            risk: Some(risk),
            guard: Some(guard),
            alert: Some(alert),
        }
    }

    /// Build and apply the rollback plan. Missing snapshot paths are
    /// reported but never block the partial rollback.
    async fn attempt_rollback(
        &self,
        plan: &ChangePlan,
        pre_snapshot: &FabricState,
    ) -> (bool, Vec<String>) {
        let build = build_rollback_plan(plan, pre_snapshot);
        if !build.missing_paths.is_empty() {
            tracing::warn!(
                plan_id = %plan.plan_id,
                missing = build.missing_paths.len(),
                "rollback cannot restore every path"
            );
        }

        if let Err(error) = self.executor.apply_plan(&build.plan).await {
            tracing::error!(
                plan_id = %build.plan.plan_id,
                error = %error.message,
                "rollback apply failed"
            );
        }
        (true, build.missing_paths)
    }
}

/// Simulated observed state: treat desired model paths as already applied.
fn simulate_observed_state(plan: &ChangePlan) -> FabricState {
    let mut observed = FabricState::new();
    for action in &plan.actions {
        let device_state = observed.entry(action.device.clone()).or_default();
        for (path, value) in &action.model_paths {
            device_state.insert(path.clone(), value.clone());
        }
    }
    observed
}
