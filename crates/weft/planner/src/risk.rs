//! Plan risk analysis.
//!
//! A deterministic blast-radius assessment that is explainable, repeatable,
//! and fabric aware. This module must remain deterministic; external
//! evaluators plug in at the engine, never here.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use weft_inventory::InventoryStore;
use weft_types::{ChangePlan, RiskLevel};

/// Devices a plan may touch before it stops being low risk.
const LOW_RISK_DEVICE_LIMIT: usize = 2;

/// Blast score at or above which a plan is high risk.
const HIGH_RISK_SCORE: u32 = 80;

/// Risk assessment result.
///
/// `blast_radius_score` is a simple numeric used to compare plans. When
/// `requires_approval` is set the engine must not apply automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub blast_radius_score: u32,
    pub requires_approval: bool,
    pub reasons: Vec<String>,
    pub evidence: Map<String, Value>,
}

/// Assess plan risk from deterministic heuristics: device count, role tier
/// criticality, and whether external-connectivity or routing-protocol
/// paths are modified.
pub fn assess_plan_risk(plan: &ChangePlan, inventory: &InventoryStore) -> RiskAssessment {
    let mut reasons: Vec<String> = Vec::new();
    let mut evidence: Map<String, Value> = Map::new();

    let unique_devices: BTreeSet<&str> =
        plan.actions.iter().map(|a| a.device.as_str()).collect();
    let device_count = unique_devices.len();

    let mut leaf_count = 0usize;
    let mut spine_count = 0usize;
    let mut super_spine_count = 0usize;
    let mut unknown_count = 0usize;

    for device in &unique_devices {
        match inventory.get(device) {
            Some(record) if record.role.is_super_spine() => super_spine_count += 1,
            Some(record) if record.role.is_spine_like() => spine_count += 1,
            Some(record) if record.role.is_leaf_like() => leaf_count += 1,
            Some(_) | None => unknown_count += 1,
        }
    }

    let mut touches_external = false;
    let mut touches_bgp = false;
    let mut touches_ospf = false;

    for action in &plan.actions {
        for path in action.model_paths.keys() {
            let p = path.to_lowercase();
            if p.contains("bgp") {
                touches_bgp = true;
            }
            if p.contains("ospf") {
                touches_ospf = true;
            }
            if p.contains("external") || p.contains("internet") || p.contains("wan") {
                touches_external = true;
            }
        }
    }

    evidence.insert("device_count".to_string(), json!(device_count));
    evidence.insert(
        "devices".to_string(),
        json!(unique_devices.iter().collect::<Vec<_>>()),
    );
    evidence.insert(
        "role_counts".to_string(),
        json!({
            "leaf": leaf_count,
            "spine": spine_count,
            "super_spine": super_spine_count,
            "unknown": unknown_count,
        }),
    );
    evidence.insert(
        "touches".to_string(),
        json!({
            "external": touches_external,
            "bgp": touches_bgp,
            "ospf": touches_ospf,
        }),
    );

    let mut blast: u32 = 0;
    blast += device_count as u32 * 10;
    blast += spine_count as u32 * 15;
    blast += super_spine_count as u32 * 25;
    blast += unknown_count as u32 * 20;

    if unknown_count > 0 {
        reasons.push("plan references devices missing from inventory".to_string());
    }
    if touches_external {
        blast += 30;
        reasons.push("plan touches external connectivity related paths".to_string());
    }
    if touches_bgp {
        blast += 20;
        reasons.push("plan modifies bgp related model paths".to_string());
    }
    if touches_ospf {
        blast += 15;
        reasons.push("plan modifies ospf related model paths".to_string());
    }
    if super_spine_count > 0 {
        reasons.push("plan touches super spine tier which impacts large blast radius".to_string());
    }
    if spine_count > 0 && device_count <= LOW_RISK_DEVICE_LIMIT {
        reasons.push("plan touches spine tier even though device count is small".to_string());
    }

    let risk_level = if device_count <= LOW_RISK_DEVICE_LIMIT
        && !(touches_external || touches_bgp || touches_ospf)
    {
        RiskLevel::Low
    } else if blast < HIGH_RISK_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    let requires_approval = risk_level == RiskLevel::High
        || touches_external
        || touches_bgp
        || touches_ospf
        || super_spine_count > 0;

    if reasons.is_empty() {
        reasons.push("risk computed from device count and role tier impact".to_string());
    }

    RiskAssessment {
        risk_level,
        blast_radius_score: blast,
        requires_approval,
        reasons,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_types::{
        ChangeAction, DeviceEndpoints, DeviceIdentity, DeviceRecord, DeviceRole, FabricLocation,
        ModelPaths, RollbackSpec, VerificationSpec,
    };

    fn make_device(name: &str, role: DeviceRole) -> DeviceRecord {
        DeviceRecord {
            name: name.to_string(),
            role,
            identity: DeviceIdentity {
                vendor: "demo".to_string(),
                model: "demo".to_string(),
                os_name: "demo".to_string(),
                os_version: "1".to_string(),
                serial: String::new(),
            },
            endpoints: DeviceEndpoints {
                mgmt_host: "10.0.0.1".to_string(),
                gnmi_host: "10.0.0.1".to_string(),
                gnmi_port: 57400,
            },
            location: FabricLocation {
                pod: "pod1".to_string(),
                rack: "r1".to_string(),
                plane: "default".to_string(),
            },
            links: Vec::new(),
            bandwidth_class: None,
            asic_class: None,
            buffer_class: None,
            table_scale_class: None,
            telemetry_class: None,
        }
    }

    fn plan_for(paths_by_device: &[(&str, &str)]) -> ChangePlan {
        let actions = paths_by_device
            .iter()
            .map(|(device, path)| {
                let mut paths = ModelPaths::new();
                paths.insert(path.to_string(), serde_json::json!(1));
                ChangeAction {
                    device: device.to_string(),
                    model_paths: paths,
                    reason: "test".to_string(),
                }
            })
            .collect();
        ChangePlan {
            plan_id: "p1".to_string(),
            actions,
            verification: VerificationSpec {
                checks: vec![],
                probes: vec![],
                window_seconds: 60,
            },
            rollback: RollbackSpec::disabled(),
            risk: RiskLevel::Low,
            explanation: String::new(),
        }
    }

    #[test]
    fn two_quiet_leaves_are_low_risk() {
        let mut store = InventoryStore::new();
        store.add(make_device("leaf1", DeviceRole::Leaf));
        store.add(make_device("leaf2", DeviceRole::Leaf));

        let plan = plan_for(&[("leaf1", "/system/hostname"), ("leaf2", "/system/hostname")]);
        let risk = assess_plan_risk(&plan, &store);

        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert!(!risk.requires_approval);
        assert_eq!(risk.blast_radius_score, 20);
        assert_eq!(
            risk.reasons,
            vec!["risk computed from device count and role tier impact"]
        );
    }

    #[test]
    fn bgp_path_forces_at_least_medium() {
        let mut store = InventoryStore::new();
        store.add(make_device("leaf1", DeviceRole::Leaf));

        let plan = plan_for(&[("leaf1", "/protocols/bgp/neighbors")]);
        let risk = assess_plan_risk(&plan, &store);

        assert_eq!(risk.risk_level, RiskLevel::Medium);
        assert!(risk.requires_approval);
        assert!(risk
            .reasons
            .iter()
            .any(|r| r.contains("bgp related model paths")));
    }

    #[test]
    fn external_path_requires_approval() {
        let mut store = InventoryStore::new();
        store.add(make_device("leaf1", DeviceRole::Leaf));

        let plan = plan_for(&[("leaf1", "/interfaces/external/config")]);
        let risk = assess_plan_risk(&plan, &store);

        assert!(risk.requires_approval);
        assert!(risk
            .reasons
            .iter()
            .any(|r| r.contains("external connectivity")));
    }

    #[test]
    fn super_spine_touch_requires_approval() {
        let mut store = InventoryStore::new();
        store.add(make_device("ss1", DeviceRole::SuperSpine));

        let plan = plan_for(&[("ss1", "/system/hostname")]);
        let risk = assess_plan_risk(&plan, &store);

        assert!(risk.requires_approval);
        assert!(risk.reasons.iter().any(|r| r.contains("super spine")));
    }

    #[test]
    fn five_leaves_with_bgp_are_medium_and_need_approval() {
        let mut store = InventoryStore::new();
        for i in 1..=5 {
            store.add(make_device(&format!("leaf{i}"), DeviceRole::Leaf));
        }

        let plan = plan_for(&[
            ("leaf1", "/protocols/bgp/neighbors"),
            ("leaf2", "/system/hostname"),
            ("leaf3", "/system/hostname"),
            ("leaf4", "/system/hostname"),
            ("leaf5", "/system/hostname"),
        ]);
        let risk = assess_plan_risk(&plan, &store);

        // 5 devices * 10 + bgp 20 = 70, below the high threshold.
        assert_eq!(risk.blast_radius_score, 70);
        assert_eq!(risk.risk_level, RiskLevel::Medium);
        assert!(risk.requires_approval);
    }

    #[test]
    fn unknown_device_scores_and_reasons() {
        let store = InventoryStore::new();

        let plan = plan_for(&[("ghost1", "/system/hostname")]);
        let risk = assess_plan_risk(&plan, &store);

        assert_eq!(risk.blast_radius_score, 30);
        assert!(risk
            .reasons
            .iter()
            .any(|r| r.contains("missing from inventory")));
    }

    #[test]
    fn assessment_is_pure() {
        let mut store = InventoryStore::new();
        store.add(make_device("spine1", DeviceRole::Spine));

        let plan = plan_for(&[("spine1", "/protocols/bgp/global")]);
        let first = assess_plan_risk(&plan, &store);
        let second = assess_plan_risk(&plan, &store);
        assert_eq!(first, second);
    }

    #[test]
    fn path_flags_are_case_insensitive() {
        let mut store = InventoryStore::new();
        store.add(make_device("leaf1", DeviceRole::Leaf));

        let plan = plan_for(&[("leaf1", "/Protocols/BGP/Global")]);
        let risk = assess_plan_risk(&plan, &store);
        assert!(risk
            .reasons
            .iter()
            .any(|r| r.contains("bgp related model paths")));
    }
}
