//! External connectivity policy.
//!
//! Two supported architectures:
//!
//! * Border-leaf model: external routing is isolated on dedicated border
//!   leaves.
//! * Spine-external model: smaller fabrics terminate external connectivity
//!   on spines, in which case every spine must do so. Partial external
//!   connectivity on a subset of spines breaks CLOS symmetry and causes
//!   congestion.
//!
//! Runs after topology validation and before any configuration is applied.

use crate::graph::FabricGraph;
use crate::report::ValidationReport;
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use weft_types::DeviceRole;

/// Validate the external connectivity architecture.
///
/// When any `border_leaf` device exists the fabric is judged as a border
/// pod: at least one border leaf must carry an external-kind link, spines
/// with external links are a mixed-mode warning, and other devices with
/// external links are a warning. Otherwise the fabric is judged as
/// spine-external: either no spine or every spine must carry an external
/// link.
pub fn validate_external_connectivity(graph: &FabricGraph) -> ValidationReport {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut evidence: Map<String, Value> = Map::new();

    let border_leafs: Vec<&str> = graph
        .nodes()
        .filter(|d| d.role == DeviceRole::BorderLeaf)
        .map(|d| d.name.as_str())
        .collect();
    let spines: Vec<&str> = graph
        .nodes()
        .filter(|d| d.role.is_spine_like())
        .map(|d| d.name.as_str())
        .collect();

    let mut border_leafs_with_external: BTreeSet<&str> = BTreeSet::new();
    let mut spines_with_external: BTreeSet<&str> = BTreeSet::new();
    let mut other_with_external: BTreeSet<&str> = BTreeSet::new();

    for device in graph.nodes() {
        for edge in graph.edges_from(&device.name) {
            if !edge.kind.is_external() {
                continue;
            }
            if device.role == DeviceRole::BorderLeaf {
                border_leafs_with_external.insert(device.name.as_str());
            } else if device.role.is_spine_like() {
                spines_with_external.insert(device.name.as_str());
            } else {
                other_with_external.insert(device.name.as_str());
            }
        }
    }

    if !border_leafs.is_empty() {
        // Border pod model.
        if border_leafs_with_external.is_empty() {
            errors.push(
                "border_leaf role present but no border_leaf has external connectivity".to_string(),
            );
        }

        // Mixed mode is not always wrong, but it should be intentional.
        if !spines_with_external.is_empty() {
            warnings.push(
                "border_leaf model detected but spines also have external links, verify design intent"
                    .to_string(),
            );
        }

        if !other_with_external.is_empty() {
            warnings.push(format!(
                "non border devices have external links: {:?}",
                other_with_external.iter().collect::<Vec<_>>()
            ));
        }
    } else if !spines.is_empty()
        && !spines_with_external.is_empty()
        && spines_with_external.len() < spines.len()
    {
        // Spine external model with a symmetry break.
        errors.push(
            "partial spine external connectivity detected. \
             If spines connect externally, all spines must connect externally."
                .to_string(),
        );
    }

    evidence.insert(
        "external_connectivity_counts".to_string(),
        json!({
            "border_leaf_count": border_leafs.len(),
            "spine_count": spines.len(),
            "border_leafs_with_external": border_leafs_with_external.len(),
            "spines_with_external": spines_with_external.len(),
            "other_with_external": other_with_external.len(),
        }),
    );
    evidence.insert(
        "external_connectivity_nodes".to_string(),
        json!({
            "border_leafs_with_external": border_leafs_with_external.iter().collect::<Vec<_>>(),
            "spines_with_external": spines_with_external.iter().collect::<Vec<_>>(),
            "other_with_external": other_with_external.iter().collect::<Vec<_>>(),
        }),
    );

    ValidationReport::finish(errors, warnings, evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_fabric_graph;
    use crate::testutil::{link, make_device};
    use weft_inventory::InventoryStore;
    use weft_types::LinkKind;

    #[test]
    fn border_leaf_model_requires_border_leaf_external_link() {
        let mut store = InventoryStore::new();
        let mut border1 = make_device("border1", DeviceRole::BorderLeaf);
        border1.links.push(link("e1", "spine1", LinkKind::Fabric));
        store.add(border1);
        store.add(make_device("spine1", DeviceRole::Spine));

        let report = validate_external_connectivity(&build_fabric_graph(&store));
        assert!(!report.ok);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("no border_leaf has external connectivity")));
    }

    #[test]
    fn border_leaf_model_allows_border_leaf_external_link() {
        let mut store = InventoryStore::new();
        let mut border1 = make_device("border1", DeviceRole::BorderLeaf);
        border1.links.push(link("e1", "spine1", LinkKind::Fabric));
        border1.links.push(link("e49", "internet", LinkKind::Internet));
        store.add(border1);
        store.add(make_device("spine1", DeviceRole::Spine));

        let report = validate_external_connectivity(&build_fabric_graph(&store));
        assert!(report.ok, "errors: {:?}", report.errors);
    }

    #[test]
    fn border_leaf_model_warns_on_spine_external_links() {
        let mut store = InventoryStore::new();
        let mut border1 = make_device("border1", DeviceRole::BorderLeaf);
        border1.links.push(link("e49", "internet", LinkKind::Internet));
        store.add(border1);
        let mut spine1 = make_device("spine1", DeviceRole::Spine);
        spine1.links.push(link("e49", "wan1", LinkKind::Wan));
        store.add(spine1);

        let report = validate_external_connectivity(&build_fabric_graph(&store));
        assert!(report.ok);
        assert!(report.warnings.iter().any(|w| w.contains("mixed") || w.contains("verify design intent")));
    }

    #[test]
    fn spine_external_model_blocks_partial_spines() {
        let mut store = InventoryStore::new();
        let mut spine1 = make_device("spine1", DeviceRole::Spine);
        spine1.links.push(link("e49", "internet", LinkKind::Internet));
        store.add(spine1);
        store.add(make_device("spine2", DeviceRole::Spine));

        let report = validate_external_connectivity(&build_fabric_graph(&store));
        assert!(!report.ok);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("partial spine external connectivity")));
    }

    #[test]
    fn spine_external_model_allows_all_spines_external() {
        let mut store = InventoryStore::new();
        let mut spine1 = make_device("spine1", DeviceRole::Spine);
        spine1.links.push(link("e49", "internet", LinkKind::Internet));
        let mut spine2 = make_device("spine2", DeviceRole::Spine);
        spine2.links.push(link("e49", "internet", LinkKind::Internet));
        store.add(spine1);
        store.add(spine2);

        let report = validate_external_connectivity(&build_fabric_graph(&store));
        assert!(report.ok, "errors: {:?}", report.errors);
    }

    #[test]
    fn spine_external_model_allows_no_external_at_all() {
        let mut store = InventoryStore::new();
        store.add(make_device("spine1", DeviceRole::Spine));
        store.add(make_device("spine2", DeviceRole::Spine));

        let report = validate_external_connectivity(&build_fabric_graph(&store));
        assert!(report.ok);
    }

    #[test]
    fn evidence_counts_are_populated() {
        let mut store = InventoryStore::new();
        let mut spine1 = make_device("spine1", DeviceRole::Spine);
        spine1.links.push(link("e49", "internet", LinkKind::Internet));
        store.add(spine1);
        store.add(make_device("spine2", DeviceRole::Spine));

        let report = validate_external_connectivity(&build_fabric_graph(&store));
        let counts = &report.evidence["external_connectivity_counts"];
        assert_eq!(counts["spine_count"], 2);
        assert_eq!(counts["spines_with_external"], 1);
    }
}
