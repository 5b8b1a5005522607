//! Deterministic planner.
//!
//! Converts an [`IntentChange`] into a [`ChangePlan`] the engine can execute
//! safely. Accepted `desired` shapes:
//!
//! 1. `{"actions": [{"device": ..., "model_paths": {...}, "reason"?: ...}]}`
//! 2. `{"device": ..., "model_paths": {...}, "reason"?: ...}` as shorthand
//!    for a single action.
//!
//! Anything else is an [`PlanError::InvalidIntent`] so the caller can report
//! a clear error to the user.

use crate::error::{PlanError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use weft_inventory::InventoryStore;
use weft_types::{
    ChangeAction, ChangePlan, Check, IntentChange, ModelPaths, RiskLevel, RollbackSpec,
    VerificationSpec,
};

const DEFAULT_REASON: &str = "intent action";

/// Planner configuration.
#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    /// A plan touching no more than this many devices is tagged low risk.
    pub max_devices_low_risk: usize,
    /// Observation window for post-change stability checks.
    pub verification_window_seconds: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_devices_low_risk: 2,
            verification_window_seconds: 60,
        }
    }
}

/// A strict planner that produces [`ChangePlan`] from [`IntentChange`].
///
/// This planner never calls external models. A proposal produced elsewhere
/// still has to pass through here (or another deterministic step) before it
/// can execute.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Convert intent into an executable plan.
    ///
    /// Inventory is used only for sanity checks such as verifying device
    /// names; finer policy belongs to the risk assessor and guard.
    pub fn plan_change(
        &self,
        intent: &IntentChange,
        inventory: &InventoryStore,
    ) -> Result<ChangePlan> {
        let actions = parse_actions(&intent.desired)?;
        validate_devices_exist(&actions, inventory)?;

        let risk = self.compute_risk(&actions);
        let verification = self.build_verification(&actions);
        let rollback = RollbackSpec {
            enabled: true,
            triggers: vec![RollbackSpec::ANY_VERIFICATION_FAILURE.to_string()],
        };

        let explanation = format!(
            "Plan created from declarative intent. Device count {}. Risk {}. Verification checks {}.",
            actions.len(),
            risk,
            verification.checks.len(),
        );

        tracing::debug!(
            change_id = %intent.change_id,
            actions = actions.len(),
            risk = %risk,
            "planned intent change"
        );

        Ok(ChangePlan {
            plan_id: intent.change_id.clone(),
            actions,
            verification,
            rollback,
            risk,
            explanation,
        })
    }

    /// Coarse risk tag. Intentionally simple; the risk assessor enforces the
    /// finer rules.
    fn compute_risk(&self, actions: &[ChangeAction]) -> RiskLevel {
        if actions.len() <= self.config.max_devices_low_risk {
            RiskLevel::Low
        } else if actions.len() <= 10 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Path-equality checks for every model path we write, in action order
    /// then path insertion order. A safe default: it verifies the device
    /// accepted the intended state.
    fn build_verification(&self, actions: &[ChangeAction]) -> VerificationSpec {
        let mut checks = Vec::new();
        for action in actions {
            for (path, expected) in &action.model_paths {
                checks.push(Check::path_equals(&action.device, path, expected.clone()));
            }
        }
        VerificationSpec {
            checks,
            probes: Vec::new(),
            window_seconds: self.config.verification_window_seconds,
        }
    }
}

fn parse_actions(desired: &Value) -> Result<Vec<ChangeAction>> {
    let obj = desired
        .as_object()
        .ok_or_else(|| PlanError::InvalidIntent("desired must be an object".to_string()))?;

    if let Some(raw_actions) = obj.get("actions") {
        let list = raw_actions.as_array().ok_or_else(|| {
            PlanError::InvalidIntent("desired.actions must be a list".to_string())
        })?;

        let mut actions = Vec::with_capacity(list.len());
        for (idx, raw) in list.iter().enumerate() {
            let entry = raw.as_object().ok_or_else(|| {
                PlanError::InvalidIntent(format!("desired.actions item {idx} must be an object"))
            })?;
            actions.push(parse_one_action(entry, &format!("desired.actions item {idx}"))?);
        }
        return Ok(actions);
    }

    if obj.contains_key("device") || obj.contains_key("model_paths") {
        return Ok(vec![parse_one_action(obj, "desired")?]);
    }

    Err(PlanError::InvalidIntent(
        "desired must include actions list or device and model_paths".to_string(),
    ))
}

fn parse_one_action(
    entry: &serde_json::Map<String, Value>,
    context: &str,
) -> Result<ChangeAction> {
    let device = entry
        .get("device")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            PlanError::InvalidIntent(format!("{context} missing non-empty device string"))
        })?;

    let model_paths = entry
        .get("model_paths")
        .and_then(Value::as_object)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            PlanError::InvalidIntent(format!("{context} missing non-empty model_paths object"))
        })?;

    let reason = match entry.get("reason") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => DEFAULT_REASON.to_string(),
    };

    let mut paths = ModelPaths::new();
    for (path, value) in model_paths {
        paths.insert(path.clone(), value.clone());
    }

    Ok(ChangeAction {
        device: device.to_string(),
        model_paths: paths,
        reason,
    })
}

/// Ensure all referenced devices exist in inventory, so the engine never
/// attempts to configure an unknown device.
fn validate_devices_exist(actions: &[ChangeAction], inventory: &InventoryStore) -> Result<()> {
    let missing: BTreeSet<String> = actions
        .iter()
        .filter(|a| inventory.get(&a.device).is_none())
        .map(|a| a.device.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PlanError::UnknownDevices(missing.into_iter().collect()))
    }
}
