//! Post-apply verification.
//!
//! Compares observed device state to the desired state a plan declared.
//! Observed state mirrors the `model_paths` shape (device name to path to
//! value), which keeps evaluation a straight lookup.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use weft_types::{Check, FabricState, VerificationSpec};

/// Verification outcome.
///
/// `ok` is true only when every check passes. `failures` are human readable;
/// `evidence` carries the ordered per-check result list for alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub ok: bool,
    pub failures: Vec<String>,
    pub evidence: Map<String, Value>,
}

/// Evaluate a [`VerificationSpec`] against observed state.
///
/// Only `path_equals` checks are supported; any other type contributes an
/// `unsupported` failure and evaluation continues. Probes are ignored.
pub fn evaluate_verification(spec: &VerificationSpec, observed: &FabricState) -> VerificationOutcome {
    let mut failures: Vec<String> = Vec::new();
    let mut check_results: Vec<Value> = Vec::new();

    for (idx, check) in spec.checks.iter().enumerate() {
        if check.check_type != Check::PATH_EQUALS {
            failures.push(format!(
                "unsupported check type at index {idx}: {}",
                check.check_type
            ));
            check_results.push(json!({
                "index": idx,
                "type": check.check_type,
                "ok": false,
                "reason": "unsupported",
            }));
            continue;
        }

        let observed_value = observed
            .get(&check.device)
            .and_then(|device_state| device_state.get(&check.path));

        match observed_value {
            None => {
                failures.push(format!(
                    "missing observed path for device {}: {}",
                    check.device, check.path
                ));
                check_results.push(json!({
                    "index": idx,
                    "type": check.check_type,
                    "device": check.device,
                    "path": check.path,
                    "ok": false,
                    "reason": "missing",
                }));
            }
            Some(value) if *value != check.expected => {
                failures.push(format!(
                    "value mismatch device {} path {} expected {} observed {}",
                    check.device, check.path, check.expected, value
                ));
                check_results.push(json!({
                    "index": idx,
                    "type": check.check_type,
                    "device": check.device,
                    "path": check.path,
                    "ok": false,
                    "expected": check.expected,
                    "observed": value,
                }));
            }
            Some(_) => {
                check_results.push(json!({
                    "index": idx,
                    "type": check.check_type,
                    "device": check.device,
                    "path": check.path,
                    "ok": true,
                }));
            }
        }
    }

    let mut evidence = Map::new();
    evidence.insert("check_results".to_string(), Value::Array(check_results));

    VerificationOutcome {
        ok: failures.is_empty(),
        failures,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_types::DeviceState;

    fn spec_with(checks: Vec<Check>) -> VerificationSpec {
        VerificationSpec {
            checks,
            probes: vec![],
            window_seconds: 60,
        }
    }

    fn observed(device: &str, path: &str, value: Value) -> FabricState {
        let mut device_state = DeviceState::new();
        device_state.insert(path.to_string(), value);
        let mut state = FabricState::new();
        state.insert(device.to_string(), device_state);
        state
    }

    #[test]
    fn matching_value_passes() {
        let spec = spec_with(vec![Check::path_equals("leaf1", "/p", json!("v"))]);
        let outcome = evaluate_verification(&spec, &observed("leaf1", "/p", json!("v")));
        assert!(outcome.ok);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.evidence["check_results"][0]["ok"], true);
    }

    #[test]
    fn mismatch_reports_both_values() {
        let spec = spec_with(vec![Check::path_equals("leaf1", "/p", json!("expected"))]);
        let outcome = evaluate_verification(&spec, &observed("leaf1", "/p", json!("wrong")));
        assert!(!outcome.ok);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].contains("value mismatch"));
        let result = &outcome.evidence["check_results"][0];
        assert_eq!(result["expected"], "expected");
        assert_eq!(result["observed"], "wrong");
    }

    #[test]
    fn missing_path_is_a_failure() {
        let spec = spec_with(vec![Check::path_equals("leaf1", "/p", json!(1))]);
        let outcome = evaluate_verification(&spec, &FabricState::new());
        assert!(!outcome.ok);
        assert!(outcome.failures[0].contains("missing observed path for device leaf1: /p"));
        assert_eq!(outcome.evidence["check_results"][0]["reason"], "missing");
    }

    #[test]
    fn unsupported_check_type_fails_and_continues() {
        let unsupported = Check {
            check_type: "bgp_established".to_string(),
            device: "leaf1".to_string(),
            path: String::new(),
            expected: Value::Null,
        };
        let supported = Check::path_equals("leaf1", "/p", json!(1));
        let spec = spec_with(vec![unsupported, supported]);

        let outcome = evaluate_verification(&spec, &observed("leaf1", "/p", json!(1)));
        assert!(!outcome.ok);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].contains("unsupported check type at index 0"));
        // The later check still ran and passed.
        assert_eq!(outcome.evidence["check_results"][1]["ok"], true);
    }

    #[test]
    fn null_observed_value_is_not_missing() {
        let spec = spec_with(vec![Check::path_equals("leaf1", "/p", json!(null))]);
        let outcome = evaluate_verification(&spec, &observed("leaf1", "/p", Value::Null));
        assert!(outcome.ok);
    }

    #[test]
    fn structural_equality_on_nested_values() {
        let expected = json!({"config": {"enabled": true, "mtu": 9100}});
        let spec = spec_with(vec![Check::path_equals("leaf1", "/intf", expected.clone())]);
        let outcome = evaluate_verification(&spec, &observed("leaf1", "/intf", expected));
        assert!(outcome.ok);
    }
}
