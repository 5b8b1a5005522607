//! Rollback construction.
//!
//! Builds the path back to the prior state from the pre-change snapshot.
//! Only paths the original plan modified are rolled back, which keeps the
//! rollback minimal and its blast radius small.

use weft_types::{
    ChangeAction, ChangePlan, Check, FabricState, ModelPaths, RiskLevel, RollbackSpec,
    VerificationSpec,
};

/// Observation window for rollback verification. Shorter than the forward
/// window: the values were known good minutes ago.
const ROLLBACK_WINDOW_SECONDS: u64 = 30;

/// Output of rollback construction.
///
/// `missing_paths` lists `device:path` entries that were in the original
/// plan but absent from the snapshot; those cannot be rolled back reliably.
/// The caller decides whether a partial rollback is still worth applying.
#[derive(Debug, Clone, PartialEq)]
pub struct RollbackBuild {
    pub plan: ChangePlan,
    pub missing_paths: Vec<String>,
}

/// Build a rollback plan from the original plan and its pre-change snapshot.
///
/// Restored paths are merged into one action per device, in first-touch
/// order mirroring the original plan. The rollback plan verifies the
/// restored values with `path_equals` checks and has rollback disabled so a
/// failed rollback never recurses.
pub fn build_rollback_plan(original: &ChangePlan, pre_snapshot: &FabricState) -> RollbackBuild {
    let mut restores: indexmap::IndexMap<String, ModelPaths> = indexmap::IndexMap::new();
    let mut missing: Vec<String> = Vec::new();

    for action in &original.actions {
        let device_snapshot = pre_snapshot.get(&action.device);
        let device_restores = restores.entry(action.device.clone()).or_default();

        for path in action.model_paths.keys() {
            if device_restores.contains_key(path) {
                continue;
            }
            match device_snapshot.and_then(|snap| snap.get(path)) {
                Some(prior) => {
                    device_restores.insert(path.clone(), prior.clone());
                }
                None => {
                    let entry = format!("{}:{path}", action.device);
                    if !missing.contains(&entry) {
                        missing.push(entry);
                    }
                }
            }
        }
    }

    let rollback_actions: Vec<ChangeAction> = restores
        .into_iter()
        .filter(|(_, paths)| !paths.is_empty())
        .map(|(device, model_paths)| ChangeAction {
            device,
            model_paths,
            reason: "rollback to pre change snapshot".to_string(),
        })
        .collect();

    let mut checks = Vec::new();
    for action in &rollback_actions {
        for (path, expected) in &action.model_paths {
            checks.push(Check::path_equals(&action.device, path, expected.clone()));
        }
    }

    let explanation = format!(
        "Rollback plan built from pre change snapshot. Actions {}. Missing paths {}.",
        rollback_actions.len(),
        missing.len(),
    );

    let plan = ChangePlan {
        plan_id: format!("{}_rollback", original.plan_id),
        actions: rollback_actions,
        verification: VerificationSpec {
            checks,
            probes: Vec::new(),
            window_seconds: ROLLBACK_WINDOW_SECONDS,
        },
        rollback: RollbackSpec::disabled(),
        risk: RiskLevel::High,
        explanation,
    };

    RollbackBuild {
        plan,
        missing_paths: missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_types::DeviceState;

    fn plan_with_action(device: &str, paths: &[(&str, serde_json::Value)]) -> ChangePlan {
        let mut model_paths = ModelPaths::new();
        for (path, value) in paths {
            model_paths.insert(path.to_string(), value.clone());
        }
        ChangePlan {
            plan_id: "orig".to_string(),
            actions: vec![ChangeAction {
                device: device.to_string(),
                model_paths,
                reason: "test".to_string(),
            }],
            verification: VerificationSpec {
                checks: vec![],
                probes: vec![],
                window_seconds: 60,
            },
            rollback: RollbackSpec {
                enabled: true,
                triggers: vec![RollbackSpec::ANY_VERIFICATION_FAILURE.to_string()],
            },
            risk: RiskLevel::Low,
            explanation: String::new(),
        }
    }

    #[test]
    fn restores_snapshot_values() {
        let plan = plan_with_action("leaf1", &[("/p", json!("new"))]);

        let mut device_state = DeviceState::new();
        device_state.insert("/p".to_string(), json!("old"));
        let mut snapshot = FabricState::new();
        snapshot.insert("leaf1".to_string(), device_state);

        let build = build_rollback_plan(&plan, &snapshot);
        assert_eq!(build.plan.plan_id, "orig_rollback");
        assert!(build.missing_paths.is_empty());
        assert_eq!(build.plan.actions.len(), 1);
        assert_eq!(build.plan.actions[0].model_paths["/p"], json!("old"));
        assert_eq!(build.plan.verification.checks.len(), 1);
        assert_eq!(build.plan.verification.window_seconds, 30);
        assert!(!build.plan.rollback.enabled);
        assert_eq!(build.plan.risk, RiskLevel::High);
    }

    #[test]
    fn missing_snapshot_paths_are_reported_and_skipped() {
        let plan = plan_with_action("leaf1", &[("/known", json!(1)), ("/unknown", json!(2))]);

        let mut device_state = DeviceState::new();
        device_state.insert("/known".to_string(), json!(0));
        let mut snapshot = FabricState::new();
        snapshot.insert("leaf1".to_string(), device_state);

        let build = build_rollback_plan(&plan, &snapshot);
        assert_eq!(build.missing_paths, vec!["leaf1:/unknown"]);
        assert_eq!(build.plan.actions.len(), 1);
        assert!(build.plan.actions[0].model_paths.contains_key("/known"));
        assert!(!build.plan.actions[0].model_paths.contains_key("/unknown"));
    }

    #[test]
    fn action_with_no_recoverable_paths_is_omitted() {
        let plan = plan_with_action("leaf1", &[("/p", json!(1))]);
        let build = build_rollback_plan(&plan, &FabricState::new());

        assert!(build.plan.actions.is_empty());
        assert_eq!(build.missing_paths, vec!["leaf1:/p"]);
        assert!(build.plan.verification.checks.is_empty());
    }

    #[test]
    fn actions_on_the_same_device_merge_into_one() {
        let mut first = plan_with_action("leaf1", &[("/a", json!("new-a"))]);
        first
            .actions
            .push(plan_with_action("leaf1", &[("/b", json!("new-b"))]).actions.remove(0));

        let mut device_state = DeviceState::new();
        device_state.insert("/a".to_string(), json!("old-a"));
        device_state.insert("/b".to_string(), json!("old-b"));
        let mut snapshot = FabricState::new();
        snapshot.insert("leaf1".to_string(), device_state);

        let build = build_rollback_plan(&first, &snapshot);
        assert_eq!(build.plan.actions.len(), 1);
        assert_eq!(build.plan.actions[0].model_paths.len(), 2);
        assert!(build.missing_paths.is_empty());
    }

    #[test]
    fn rollback_paths_are_subset_of_original() {
        let plan = ChangePlan {
            actions: vec![
                plan_with_action("leaf1", &[("/a", json!(1))]).actions.remove(0),
                plan_with_action("leaf2", &[("/b", json!(2)), ("/c", json!(3))])
                    .actions
                    .remove(0),
            ],
            ..plan_with_action("x", &[("/ignored", json!(0))])
        };

        let mut leaf2_state = DeviceState::new();
        leaf2_state.insert("/b".to_string(), json!("prior"));
        let mut snapshot = FabricState::new();
        snapshot.insert("leaf2".to_string(), leaf2_state);

        let build = build_rollback_plan(&plan, &snapshot);
        // One action per device with recoverable paths, order preserved.
        assert_eq!(build.plan.actions.len(), 1);
        assert_eq!(build.plan.actions[0].device, "leaf2");
        for path in build.plan.actions[0].model_paths.keys() {
            assert!(plan.actions[1].model_paths.contains_key(path));
        }
        assert_eq!(build.missing_paths, vec!["leaf1:/a", "leaf2:/c"]);
    }
}
