//! Structured alerts emitted by failed or blocked runs.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use weft_planner::RiskAssessment;

/// Alert severity.
///
/// `Info` for expected non-apply outcomes (dry run), `Warning` for failures
/// that never touched a device, `Critical` for post-apply failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Alert produced by an orchestration run that did not complete cleanly.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    /// One-line summary for operators.
    pub summary: String,
    /// Plan id the alert belongs to, when planning got that far.
    pub plan_id: Option<String>,
    /// Risk assessment attached for operators, when computed.
    pub risk: Option<RiskAssessment>,
    /// Human-readable verification failures.
    pub verification_failures: Vec<String>,
    /// Structured evidence from the verifier or validators.
    pub evidence: Map<String, Value>,
    /// True when rollback logic ran.
    pub rollback_attempted: bool,
    /// `device:path` entries a rollback could not restore.
    pub unrecoverable_paths: Vec<String>,
}

impl Alert {
    pub(crate) fn new(severity: AlertSeverity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            plan_id: None,
            risk: None,
            verification_failures: Vec::new(),
            evidence: Map::new(),
            rollback_attempted: false,
            unrecoverable_paths: Vec::new(),
        }
    }
}
