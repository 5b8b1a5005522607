//! Device records as normalized by inventory sources.
//!
//! The inventory layer produces these; the graph, planner, and executor only
//! ever see this view, never the raw source schema.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Device roles in a CLOS fabric.
///
/// `BorderLeaf` concentrates external connectivity in a border-pod design.
/// `BorderSpine` is only used when smaller fabrics connect externally via
/// spines, in which case every spine must connect externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRole {
    Leaf,
    Spine,
    SuperSpine,
    BorderLeaf,
    BorderSpine,
    ServicesLeaf,
    EdgeLeaf,
}

impl DeviceRole {
    /// True for roles that behave like a leaf in topology terms.
    ///
    /// A border leaf still behaves like a leaf inside the fabric even though
    /// it also connects externally.
    pub fn is_leaf_like(self) -> bool {
        matches!(
            self,
            DeviceRole::Leaf
                | DeviceRole::BorderLeaf
                | DeviceRole::ServicesLeaf
                | DeviceRole::EdgeLeaf
        )
    }

    /// True for roles that behave like a spine layer.
    pub fn is_spine_like(self) -> bool {
        matches!(self, DeviceRole::Spine | DeviceRole::BorderSpine)
    }

    /// True only for the optional third tier.
    pub fn is_super_spine(self) -> bool {
        matches!(self, DeviceRole::SuperSpine)
    }

    /// True for roles intended to carry external connectivity.
    pub fn is_border_like(self) -> bool {
        matches!(self, DeviceRole::BorderLeaf | DeviceRole::BorderSpine)
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceRole::Leaf => "leaf",
            DeviceRole::Spine => "spine",
            DeviceRole::SuperSpine => "super_spine",
            DeviceRole::BorderLeaf => "border_leaf",
            DeviceRole::BorderSpine => "border_spine",
            DeviceRole::ServicesLeaf => "services_leaf",
            DeviceRole::EdgeLeaf => "edge_leaf",
        };
        write!(f, "{s}")
    }
}

/// Link classification.
///
/// The distinction between internal and external kinds is what lets the
/// validators enforce the border-pod and spine-external connectivity models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Internal CLOS fabric link.
    Fabric,
    /// Leaf-to-leaf peer link for MLAG pairs. Never a fabric uplink.
    MlagPeer,
    /// External neighbor not managed in inventory.
    External,
    /// External link intended for internet-facing connectivity.
    Internet,
    /// External link intended for private WAN connectivity.
    Wan,
}

impl LinkKind {
    /// True for kinds that denote external connectivity.
    pub fn is_external(self) -> bool {
        matches!(self, LinkKind::External | LinkKind::Internet | LinkKind::Wan)
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkKind::Fabric => "fabric",
            LinkKind::MlagPeer => "mlag_peer",
            LinkKind::External => "external",
            LinkKind::Internet => "internet",
            LinkKind::Wan => "wan",
        };
        write!(f, "{s}")
    }
}

/// Confidence for derived facts.
///
/// `High` was observed directly from a device or trusted source, `Medium`
/// was inferred from multiple signals, `Low` is heuristic or incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Why we believe a derived fact is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Where the fact came from (netbox, gnmi, a capability catalog, ...).
    pub source: String,
    /// Short reason string.
    pub detail: String,
}

/// A normalized capability classification.
///
/// The orchestrator makes decisions in buckets (small/medium/large table
/// scale, low/medium/high buffers) rather than raw numbers, so sources
/// normalize into named classes with confidence and evidence attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityClass {
    pub name: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Vendor identity for a device, used by adapter selection and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub vendor: String,
    pub model: String,
    pub os_name: String,
    pub os_version: String,
    #[serde(default)]
    pub serial: String,
}

/// How to reach a device.
///
/// `mgmt_host` serves auxiliary protocols; `gnmi_host`/`gnmi_port` carry the
/// model-driven session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEndpoints {
    pub mgmt_host: String,
    pub gnmi_host: String,
    #[serde(default = "default_gnmi_port")]
    pub gnmi_port: u16,
}

fn default_gnmi_port() -> u16 {
    57400
}

/// Fabric location.
///
/// Pods group devices into failure domains and scaling units; rack supports
/// placement-aware planning; plane supports multi-plane fabrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricLocation {
    pub pod: String,
    pub rack: String,
    #[serde(default = "default_plane")]
    pub plane: String,
}

fn default_plane() -> String {
    "default".to_string()
}

/// Link from one device interface to a peer.
///
/// `peer_device` may name a managed device or an unmanaged external
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub local_intf: String,
    pub peer_device: String,
    pub peer_intf: String,
    pub kind: LinkKind,
}

/// A device record in the inventory store.
///
/// `links` is populated by inventory sources (NetBox cabling and the like);
/// the capability classes are populated by enrichment plugins when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub name: String,
    pub role: DeviceRole,
    pub identity: DeviceIdentity,
    pub endpoints: DeviceEndpoints,
    pub location: FabricLocation,
    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_class: Option<CapabilityClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asic_class: Option<CapabilityClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_class: Option<CapabilityClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_scale_class: Option<CapabilityClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry_class: Option<CapabilityClass>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_classification_buckets() {
        assert!(DeviceRole::Leaf.is_leaf_like());
        assert!(DeviceRole::BorderLeaf.is_leaf_like());
        assert!(DeviceRole::ServicesLeaf.is_leaf_like());
        assert!(DeviceRole::EdgeLeaf.is_leaf_like());
        assert!(!DeviceRole::Spine.is_leaf_like());

        assert!(DeviceRole::Spine.is_spine_like());
        assert!(DeviceRole::BorderSpine.is_spine_like());
        assert!(!DeviceRole::SuperSpine.is_spine_like());

        assert!(DeviceRole::SuperSpine.is_super_spine());

        assert!(DeviceRole::BorderLeaf.is_border_like());
        assert!(DeviceRole::BorderSpine.is_border_like());
        assert!(!DeviceRole::Leaf.is_border_like());
    }

    #[test]
    fn roles_serialize_as_snake_case_strings() {
        let json = serde_json::to_string(&DeviceRole::SuperSpine).unwrap();
        assert_eq!(json, "\"super_spine\"");
        let back: DeviceRole = serde_json::from_str("\"border_leaf\"").unwrap();
        assert_eq!(back, DeviceRole::BorderLeaf);
    }

    #[test]
    fn external_link_kinds() {
        assert!(LinkKind::External.is_external());
        assert!(LinkKind::Internet.is_external());
        assert!(LinkKind::Wan.is_external());
        assert!(!LinkKind::Fabric.is_external());
        assert!(!LinkKind::MlagPeer.is_external());
    }

    #[test]
    fn endpoints_default_gnmi_port() {
        let ep: DeviceEndpoints =
            serde_json::from_str(r#"{"mgmt_host": "10.0.0.1", "gnmi_host": "10.0.0.1"}"#).unwrap();
        assert_eq!(ep.gnmi_port, 57400);
    }
}
