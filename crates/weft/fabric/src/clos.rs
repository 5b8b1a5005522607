//! CLOS topology invariants.
//!
//! Deliberately conservative: this does not try to validate every possible
//! deployment, only the invariants that keep the orchestrator safe.

use crate::graph::FabricGraph;
use crate::report::ValidationReport;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use weft_types::LinkKind;

/// Role bucket of a managed fabric neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeerClass {
    LeafLike,
    SpineLike,
    SuperSpine,
}

fn peer_class(graph: &FabricGraph, peer: &str) -> Option<PeerClass> {
    let role = graph.node(peer)?.role;
    if role.is_leaf_like() {
        Some(PeerClass::LeafLike)
    } else if role.is_spine_like() {
        Some(PeerClass::SpineLike)
    } else if role.is_super_spine() {
        Some(PeerClass::SuperSpine)
    } else {
        None
    }
}

fn sorted_unique(names: &[String]) -> Vec<String> {
    names
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Validate basic CLOS invariants.
///
/// 1. Every leaf-like device needs at least two fabric uplinks terminating
///    on spine-like devices.
/// 2. Spine-like devices should only have leaf-like or super-spine fabric
///    neighbors; anything else is a warning.
/// 3. Super spines, when present, must connect only to spines via fabric
///    links and must have at least one spine neighbor.
///
/// MLAG peer links never count as fabric uplinks, and fabric edges to
/// unmanaged peers count as unknown for the spine neighbor checks.
pub fn validate_clos_topology(graph: &FabricGraph) -> ValidationReport {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut evidence: Map<String, Value> = Map::new();

    let mut leaf_names: Vec<String> = Vec::new();
    let mut spine_names: Vec<String> = Vec::new();
    let mut super_spine_names: Vec<String> = Vec::new();

    for device in graph.nodes() {
        if device.role.is_leaf_like() {
            leaf_names.push(device.name.clone());
        } else if device.role.is_spine_like() {
            spine_names.push(device.name.clone());
        } else if device.role.is_super_spine() {
            super_spine_names.push(device.name.clone());
        }
    }

    evidence.insert(
        "device_counts".to_string(),
        json!({
            "leaf_like": leaf_names.len(),
            "spine_like": spine_names.len(),
            "super_spine": super_spine_names.len(),
        }),
    );

    // Leaf uplink redundancy.
    let mut leaf_uplink_evidence = Map::new();
    for leaf in &leaf_names {
        let mut uplinks_to_spines = 0usize;
        let mut fabric_neighbors: BTreeSet<&str> = BTreeSet::new();

        for edge in graph.edges_from(leaf) {
            if edge.kind != LinkKind::Fabric {
                continue;
            }
            fabric_neighbors.insert(edge.peer_device.as_str());
            if peer_class(graph, &edge.peer_device) == Some(PeerClass::SpineLike) {
                uplinks_to_spines += 1;
            }
        }

        leaf_uplink_evidence.insert(
            leaf.clone(),
            json!({
                "fabric_uplinks_to_spines": uplinks_to_spines,
                "fabric_neighbor_count": fabric_neighbors.len(),
            }),
        );

        if uplinks_to_spines < 2 {
            errors.push(format!(
                "leaf like device {leaf} has only {uplinks_to_spines} fabric uplinks to spines, require at least 2"
            ));
        }
    }
    evidence.insert("leaf_uplinks".to_string(), Value::Object(leaf_uplink_evidence));

    // Spine neighbor roles. In a two-tier design spines connect to leaf-like
    // devices; in a three-tier design also to super spines.
    let mut spine_neighbor_evidence = Map::new();
    for spine in &spine_names {
        let mut bad_neighbors: Vec<String> = Vec::new();
        let mut role_counts = [0usize; 4]; // leaf_like, spine_like, super_spine, unknown

        for edge in graph.edges_from(spine) {
            if edge.kind != LinkKind::Fabric {
                continue;
            }
            match peer_class(graph, &edge.peer_device) {
                None => {
                    role_counts[3] += 1;
                    bad_neighbors.push(edge.peer_device.clone());
                }
                Some(PeerClass::LeafLike) => role_counts[0] += 1,
                Some(PeerClass::SuperSpine) => role_counts[2] += 1,
                Some(PeerClass::SpineLike) => {
                    role_counts[1] += 1;
                    bad_neighbors.push(edge.peer_device.clone());
                }
            }
        }

        spine_neighbor_evidence.insert(
            spine.clone(),
            json!({
                "fabric_neighbor_roles": {
                    "leaf_like": role_counts[0],
                    "spine_like": role_counts[1],
                    "super_spine": role_counts[2],
                    "unknown": role_counts[3],
                },
                "bad_fabric_neighbors": bad_neighbors,
            }),
        );

        if !bad_neighbors.is_empty() {
            warnings.push(format!(
                "spine like device {spine} has fabric neighbors that are unexpected: {:?}",
                sorted_unique(&bad_neighbors)
            ));
        }
    }
    evidence.insert(
        "spine_neighbors".to_string(),
        Value::Object(spine_neighbor_evidence),
    );

    // Super spine constraints, when the third tier exists. Each super spine
    // is judged on its own neighbor list.
    if !super_spine_names.is_empty() {
        let mut super_spine_evidence = Map::new();

        for ss in &super_spine_names {
            let mut bad_neighbors: Vec<String> = Vec::new();
            let mut spine_neighbor_count = 0usize;

            for edge in graph.edges_from(ss) {
                if edge.kind != LinkKind::Fabric {
                    continue;
                }
                if peer_class(graph, &edge.peer_device) == Some(PeerClass::SpineLike) {
                    spine_neighbor_count += 1;
                } else {
                    bad_neighbors.push(edge.peer_device.clone());
                }
            }

            super_spine_evidence.insert(
                ss.clone(),
                json!({
                    "spine_neighbor_count": spine_neighbor_count,
                    "bad_neighbors": bad_neighbors,
                }),
            );

            if !bad_neighbors.is_empty() {
                errors.push(format!(
                    "super spine {ss} has fabric neighbors that are not spines: {:?}",
                    sorted_unique(&bad_neighbors)
                ));
            }
            if spine_neighbor_count == 0 {
                errors.push(format!("super spine {ss} has no spine neighbors via fabric links"));
            }
        }

        evidence.insert(
            "super_spine_neighbors".to_string(),
            Value::Object(super_spine_evidence),
        );
    }

    ValidationReport::finish(errors, warnings, evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_fabric_graph;
    use crate::testutil::{link, make_device};
    use weft_inventory::InventoryStore;
    use weft_types::DeviceRole;

    #[test]
    fn leaf_with_single_uplink_fails() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("e1", "spine1", LinkKind::Fabric));
        store.add(leaf);
        store.add(make_device("spine1", DeviceRole::Spine));
        store.add(make_device("spine2", DeviceRole::Spine));

        let report = validate_clos_topology(&build_fabric_graph(&store));
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.contains("require at least 2")));
    }

    #[test]
    fn leaf_with_two_uplinks_passes() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("e1", "spine1", LinkKind::Fabric));
        leaf.links.push(link("e2", "spine2", LinkKind::Fabric));
        store.add(leaf);
        store.add(make_device("spine1", DeviceRole::Spine));
        store.add(make_device("spine2", DeviceRole::Spine));

        let report = validate_clos_topology(&build_fabric_graph(&store));
        assert!(report.ok, "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn mlag_peer_links_do_not_count_as_uplinks() {
        let mut store = InventoryStore::new();
        let mut leaf1 = make_device("leaf1", DeviceRole::Leaf);
        leaf1.links.push(link("e1", "spine1", LinkKind::Fabric));
        leaf1.links.push(link("e2", "spine2", LinkKind::Fabric));
        leaf1.links.push(link("po1", "leaf2", LinkKind::MlagPeer));
        let mut leaf2 = make_device("leaf2", DeviceRole::Leaf);
        leaf2.links.push(link("e1", "spine1", LinkKind::Fabric));
        store.add(leaf1);
        store.add(leaf2);
        store.add(make_device("spine1", DeviceRole::Spine));
        store.add(make_device("spine2", DeviceRole::Spine));

        let report = validate_clos_topology(&build_fabric_graph(&store));
        // leaf2 only has one real uplink; the mlag peer edge must not help.
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.contains("leaf2")));
        assert!(!report.errors.iter().any(|e| e.contains("leaf1 ")));
    }

    #[test]
    fn spine_with_unmanaged_fabric_neighbor_warns() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("e1", "spine1", LinkKind::Fabric));
        leaf.links.push(link("e2", "spine2", LinkKind::Fabric));
        store.add(leaf);
        let mut spine1 = make_device("spine1", DeviceRole::Spine);
        spine1.links.push(link("e48", "mystery", LinkKind::Fabric));
        store.add(spine1);
        store.add(make_device("spine2", DeviceRole::Spine));

        let report = validate_clos_topology(&build_fabric_graph(&store));
        assert!(report.ok);
        assert!(report.warnings.iter().any(|w| w.contains("spine1")));
    }

    #[test]
    fn super_spine_errors_are_scoped_per_device() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("e1", "spine1", LinkKind::Fabric));
        leaf.links.push(link("e2", "spine2", LinkKind::Fabric));
        store.add(leaf);
        store.add(make_device("spine1", DeviceRole::Spine));
        store.add(make_device("spine2", DeviceRole::Spine));

        // ss1 is clean; ss2 has a leaf neighbor and no spine neighbor.
        let mut ss1 = make_device("ss1", DeviceRole::SuperSpine);
        ss1.links.push(link("e1", "spine1", LinkKind::Fabric));
        let mut ss2 = make_device("ss2", DeviceRole::SuperSpine);
        ss2.links.push(link("e1", "leaf1", LinkKind::Fabric));
        store.add(ss1);
        store.add(ss2);

        let report = validate_clos_topology(&build_fabric_graph(&store));
        assert!(!report.ok);
        assert!(!report.errors.iter().any(|e| e.contains("ss1")));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("ss2") && e.contains("not spines")));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("ss2") && e.contains("no spine neighbors")));
    }

    #[test]
    fn super_spine_without_spine_neighbor_fails() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("e1", "spine1", LinkKind::Fabric));
        leaf.links.push(link("e2", "spine2", LinkKind::Fabric));
        store.add(leaf);
        store.add(make_device("spine1", DeviceRole::Spine));
        store.add(make_device("spine2", DeviceRole::Spine));
        store.add(make_device("ss1", DeviceRole::SuperSpine));

        let report = validate_clos_topology(&build_fabric_graph(&store));
        assert!(!report.ok);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("ss1") && e.contains("no spine neighbors")));
    }
}
