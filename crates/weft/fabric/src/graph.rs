//! Fabric graph built from normalized inventory.
//!
//! Edges are directional in this representation even though physical links
//! are bidirectional: the builder adds the reverse edge itself whenever the
//! peer is a managed device, so the graph stays usable when a source only
//! describes one direction.

use indexmap::IndexMap;
use weft_inventory::InventoryStore;
use weft_types::{DeviceRecord, LinkKind};

/// One adjacency entry.
///
/// Intentionally similar to [`weft_types::Link`] but separate, so graph
/// logic can evolve without touching the inventory layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub local_intf: String,
    pub peer_device: String,
    pub peer_intf: String,
    pub kind: LinkKind,
}

/// The in-memory topology: device records plus per-device edge lists.
#[derive(Debug, Clone)]
pub struct FabricGraph {
    nodes: IndexMap<String, DeviceRecord>,
    adjacency: IndexMap<String, Vec<GraphEdge>>,
}

impl FabricGraph {
    /// Outgoing edges for a device name.
    pub fn edges_from(&self, device: &str) -> &[GraphEdge] {
        self.adjacency.get(device).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_device(&self, device: &str) -> bool {
        self.nodes.contains_key(device)
    }

    pub fn node(&self, device: &str) -> Option<&DeviceRecord> {
        self.nodes.get(device)
    }

    /// All managed device records in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.nodes.values()
    }
}

/// Build a [`FabricGraph`] from an inventory store.
///
/// For every link a forward edge is added; when the peer is also managed a
/// symmetric reverse edge is added with the interfaces swapped. Duplicate
/// or conflicting links are not reconciled here, the validators detect
/// those.
pub fn build_fabric_graph(store: &InventoryStore) -> FabricGraph {
    let mut nodes: IndexMap<String, DeviceRecord> = IndexMap::new();
    let mut adjacency: IndexMap<String, Vec<GraphEdge>> = IndexMap::new();

    for device in store.all() {
        nodes.insert(device.name.clone(), device.clone());
        adjacency.entry(device.name.clone()).or_default();
    }

    for device in store.all() {
        for link in &device.links {
            adjacency
                .entry(device.name.clone())
                .or_default()
                .push(GraphEdge {
                    local_intf: link.local_intf.clone(),
                    peer_device: link.peer_device.clone(),
                    peer_intf: link.peer_intf.clone(),
                    kind: link.kind,
                });

            if nodes.contains_key(&link.peer_device) {
                adjacency
                    .entry(link.peer_device.clone())
                    .or_default()
                    .push(GraphEdge {
                        local_intf: link.peer_intf.clone(),
                        peer_device: device.name.clone(),
                        peer_intf: link.local_intf.clone(),
                        kind: link.kind,
                    });
            }
        }
    }

    FabricGraph { nodes, adjacency }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_device;
    use weft_types::{DeviceRole, Link};

    fn link(peer: &str, kind: LinkKind) -> Link {
        Link {
            local_intf: "e1".to_string(),
            peer_device: peer.to_string(),
            peer_intf: "e1".to_string(),
            kind,
        }
    }

    #[test]
    fn managed_peer_gets_reverse_edge() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("spine1", LinkKind::Fabric));
        store.add(leaf);
        store.add(make_device("spine1", DeviceRole::Spine));

        let graph = build_fabric_graph(&store);
        assert_eq!(graph.edges_from("leaf1").len(), 1);
        assert_eq!(graph.edges_from("spine1").len(), 1);
        let reverse = &graph.edges_from("spine1")[0];
        assert_eq!(reverse.peer_device, "leaf1");
        assert_eq!(reverse.kind, LinkKind::Fabric);
    }

    #[test]
    fn unmanaged_peer_stays_one_directional() {
        let mut store = InventoryStore::new();
        let mut spine = make_device("spine1", DeviceRole::Spine);
        spine.links.push(link("internet", LinkKind::Internet));
        store.add(spine);

        let graph = build_fabric_graph(&store);
        assert_eq!(graph.edges_from("spine1").len(), 1);
        assert!(!graph.has_device("internet"));
        assert!(graph.edges_from("internet").is_empty());
    }

    #[test]
    fn rebuilding_yields_equal_adjacency() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("spine1", LinkKind::Fabric));
        leaf.links.push(link("spine2", LinkKind::Fabric));
        store.add(leaf);
        store.add(make_device("spine1", DeviceRole::Spine));
        store.add(make_device("spine2", DeviceRole::Spine));

        let a = build_fabric_graph(&store);
        let b = build_fabric_graph(&store);
        for device in ["leaf1", "spine1", "spine2"] {
            assert_eq!(a.edges_from(device), b.edges_from(device));
        }
    }

    #[test]
    fn duplicate_links_are_not_deduplicated() {
        let mut store = InventoryStore::new();
        let mut leaf = make_device("leaf1", DeviceRole::Leaf);
        leaf.links.push(link("spine1", LinkKind::Fabric));
        leaf.links.push(link("spine1", LinkKind::Fabric));
        store.add(leaf);
        store.add(make_device("spine1", DeviceRole::Spine));

        let graph = build_fabric_graph(&store);
        assert_eq!(graph.edges_from("leaf1").len(), 2);
        assert_eq!(graph.edges_from("spine1").len(), 2);
    }
}
