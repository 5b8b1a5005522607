//! Intent records as produced by intent sources.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A desired-state update supplied by an operator or upstream system.
///
/// `desired` and `current` are intentionally opaque JSON because different
/// sources represent intent differently; the planner owns the accepted
/// shapes and validates at its boundary. `diff_summary` is the human-readable
/// explanation carried into audit logs and alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentChange {
    pub change_id: String,
    pub scope: String,
    #[serde(default)]
    pub desired: Value,
    #[serde(default)]
    pub current: Value,
    #[serde(default)]
    pub diff_summary: String,
}
