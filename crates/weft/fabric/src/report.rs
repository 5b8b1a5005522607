//! Validation report shared by the topology and external-connectivity
//! validators.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of a fabric validation pass.
///
/// Errors block plan execution on the inventory that produced them;
/// warnings are non-blocking but important signals. Evidence holds
/// role-bucketed counts and per-device neighbor summaries suitable for
/// direct inclusion in an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub evidence: Map<String, Value>,
}

impl ValidationReport {
    pub(crate) fn finish(
        errors: Vec<String>,
        warnings: Vec<String>,
        evidence: Map<String, Value>,
    ) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
            warnings,
            evidence,
        }
    }
}
