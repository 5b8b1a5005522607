//! Execution guard.
//!
//! Converts a risk assessment into an execution decision. Proposals can come
//! from anywhere, including an external evaluation service; the guard is
//! where the fabric is protected from unsafe ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use weft_planner::RiskAssessment;
use weft_types::RiskLevel;

/// How the engine is allowed to proceed with a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Apply the plan through the executor.
    Apply,
    /// Skip the executor and verify against a simulated observed state
    /// equal to the desired values.
    Simulate,
    /// Build the plan and report risk, but do not apply.
    DryRun,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionMode::Apply => "apply",
            ExecutionMode::Simulate => "simulate",
            ExecutionMode::DryRun => "dry_run",
        };
        write!(f, "{s}")
    }
}

/// Guard configuration.
#[derive(Debug, Clone, Copy)]
pub struct GuardConfig {
    /// Mode used when risk is low or medium.
    pub default_mode: ExecutionMode,
    /// Mode used when risk is high.
    pub high_risk_mode: ExecutionMode,
    /// When true, `requires_approval` always disables apply.
    pub require_approval_blocks_apply: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            default_mode: ExecutionMode::Apply,
            high_risk_mode: ExecutionMode::DryRun,
            require_approval_blocks_apply: true,
        }
    }
}

/// Guard decision.
///
/// When `allowed` is false the engine must not apply. `reasons` carries
/// every reason from the risk assessment plus the rule that fired, suitable
/// for an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardDecision {
    pub mode: ExecutionMode,
    pub allowed: bool,
    pub reasons: Vec<String>,
}

/// Decide execution mode from a risk assessment.
#[derive(Debug, Clone, Default)]
pub struct ExecutionGuard {
    config: GuardConfig,
}

impl ExecutionGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Rules, in order: high risk uses the high-risk mode; approval
    /// requirements block apply; everything else follows the default mode.
    pub fn decide(&self, risk: &RiskAssessment) -> GuardDecision {
        let mut reasons = risk.reasons.clone();

        if risk.risk_level == RiskLevel::High {
            let mode = self.config.high_risk_mode;
            let allowed = mode == ExecutionMode::Apply;
            reasons.push("high risk plan guarded by high risk mode".to_string());
            tracing::info!(%mode, allowed, "guard decision for high risk plan");
            return GuardDecision {
                mode,
                allowed,
                reasons,
            };
        }

        if self.config.require_approval_blocks_apply && risk.requires_approval {
            reasons.push("plan requires approval so apply is blocked".to_string());
            return GuardDecision {
                mode: ExecutionMode::DryRun,
                allowed: false,
                reasons,
            };
        }

        let mode = self.config.default_mode;
        let mut allowed = mode == ExecutionMode::Apply;
        match mode {
            ExecutionMode::Simulate => {
                allowed = false;
                reasons.push("default mode is simulate so apply is not performed".to_string());
            }
            ExecutionMode::DryRun => {
                allowed = false;
                reasons.push("default mode is dry_run so apply is not performed".to_string());
            }
            ExecutionMode::Apply => {}
        }

        GuardDecision {
            mode,
            allowed,
            reasons,
        }
    }
}
