//! Plans, actions, and the verification/rollback specs that travel with them.
//!
//! A plan exclusively owns its actions and specs and is immutable once the
//! planner hands it over. A rollback plan is a fresh plan whose id is the
//! original id with a `_rollback` suffix and whose own rollback is disabled.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Model path to desired value, in intent insertion order.
///
/// Insertion order matters: verification checks are generated in this order
/// and a plan round-trips through JSON without reshuffling.
pub type ModelPaths = IndexMap<String, Value>;

/// A single device action produced by the planner.
///
/// Keys are model path strings (OpenConfig style); vendor CLI never appears
/// in this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeAction {
    pub device: String,
    pub model_paths: ModelPaths,
    pub reason: String,
}

/// One verification check.
///
/// Checks carry a type tag plus type-specific fields. Only `path_equals` is
/// evaluated today; the verifier reports anything else as unsupported
/// rather than silently passing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub expected: Value,
}

impl Check {
    /// The only check type the verifier currently evaluates.
    pub const PATH_EQUALS: &'static str = "path_equals";

    pub fn path_equals(
        device: impl Into<String>,
        path: impl Into<String>,
        expected: Value,
    ) -> Self {
        Self {
            check_type: Self::PATH_EQUALS.to_string(),
            device: device.into(),
            path: path.into(),
            expected,
        }
    }
}

/// Verification specification.
///
/// `checks` are deterministic state checks. `probes` are active probes
/// (ping, tcp connect); they are carried through for future use but never
/// evaluated by the core. `window_seconds` is the observation window for
/// post-change stability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSpec {
    pub checks: Vec<Check>,
    #[serde(default)]
    pub probes: Vec<Value>,
    pub window_seconds: u64,
}

/// Rollback specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackSpec {
    pub enabled: bool,
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl RollbackSpec {
    /// Trigger tag used by the planner's default rollback spec.
    pub const ANY_VERIFICATION_FAILURE: &'static str = "any_verification_failure";

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            triggers: Vec::new(),
        }
    }
}

/// Coarse risk level used by guard rules and plan tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Structured output of the planner.
///
/// `plan_id` equals the intent's change id. `risk` is the planner's coarse
/// pre-assessment hint; the risk assessor produces the authoritative value.
/// `explanation` is stored for audit and operator review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangePlan {
    pub plan_id: String,
    pub actions: Vec<ChangeAction>,
    pub verification: VerificationSpec,
    pub rollback: RollbackSpec,
    pub risk: RiskLevel,
    pub explanation: String,
}

impl ChangePlan {
    /// Unique devices touched by this plan, in first-touch order.
    pub fn touched_devices(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for action in &self.actions {
            if !seen.contains(&action.device.as_str()) {
                seen.push(action.device.as_str());
            }
        }
        seen
    }
}
