//! Shared fixtures for fabric tests.

use weft_types::{
    DeviceEndpoints, DeviceIdentity, DeviceRecord, DeviceRole, FabricLocation, Link, LinkKind,
};

pub(crate) fn make_device(name: &str, role: DeviceRole) -> DeviceRecord {
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

pub(crate) fn link(local: &str, peer: &str, kind: LinkKind) -> Link {
    Link {
        local_intf: local.to_string(),
        peer_device: peer.to_string(),
        peer_intf: "e1".to_string(),
        kind,
    }
}
