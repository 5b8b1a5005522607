//! Static inventory source: a local JSON file of devices.
//!
//! Useful for dev, tests, and small demos. Schema:
//!
//! ```json
//! {
//!   "devices": [
//!     {
//!       "name": "leaf1",
//!       "role": "leaf",
//!       "identity": {"vendor": "arista", "model": "7050", "os_name": "eos", "os_version": "4.30"},
//!       "endpoints": {"mgmt_host": "10.0.0.1", "gnmi_host": "10.0.0.1"},
//!       "location": {"pod": "pod1", "rack": "r1"},
//!       "links": [
//!         {"local_intf": "e1", "peer_device": "spine1", "peer_intf": "e1", "kind": "fabric"}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Unknown fields are ignored and missing strings default to empty; a
//! missing `role` or link `kind` is a hard error because validation and
//! planning cannot reason about a device without them.

use crate::error::Result;
use crate::source::InventorySource;
use crate::store::InventoryStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use weft_types::{
    DeviceEndpoints, DeviceIdentity, DeviceRecord, DeviceRole, FabricLocation, Link, LinkKind,
};

#[derive(Debug, Deserialize)]
pub(crate) struct RawInventory {
    #[serde(default)]
    devices: Vec<RawDevice>,
}

#[derive(Debug, Deserialize)]
struct RawDevice {
    #[serde(default)]
    name: String,
    role: DeviceRole,
    #[serde(default)]
    identity: RawIdentity,
    #[serde(default)]
    endpoints: RawEndpoints,
    #[serde(default)]
    location: RawLocation,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Default, Deserialize)]
struct RawIdentity {
    #[serde(default)]
    vendor: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    os_name: String,
    #[serde(default)]
    os_version: String,
    #[serde(default)]
    serial: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawEndpoints {
    #[serde(default)]
    mgmt_host: String,
    #[serde(default)]
    gnmi_host: String,
    #[serde(default = "default_gnmi_port")]
    gnmi_port: u16,
}

fn default_gnmi_port() -> u16 {
    57400
}

#[derive(Debug, Default, Deserialize)]
struct RawLocation {
    #[serde(default)]
    pod: String,
    #[serde(default)]
    rack: String,
    #[serde(default = "default_plane")]
    plane: String,
}

fn default_plane() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(default)]
    local_intf: String,
    #[serde(default)]
    peer_device: String,
    #[serde(default)]
    peer_intf: String,
    kind: LinkKind,
}

impl RawDevice {
    fn into_record(self) -> DeviceRecord {
        DeviceRecord {
            name: self.name,
            role: self.role,
            identity: DeviceIdentity {
                vendor: self.identity.vendor,
                model: self.identity.model,
                os_name: self.identity.os_name,
                os_version: self.identity.os_version,
                serial: self.identity.serial,
            },
            endpoints: DeviceEndpoints {
                mgmt_host: self.endpoints.mgmt_host,
                gnmi_host: self.endpoints.gnmi_host,
                gnmi_port: self.endpoints.gnmi_port,
            },
            location: FabricLocation {
                pod: self.location.pod,
                rack: self.location.rack,
                plane: self.location.plane,
            },
            links: self
                .links
                .into_iter()
                .map(|l| Link {
                    local_intf: l.local_intf,
                    peer_device: l.peer_device,
                    peer_intf: l.peer_intf,
                    kind: l.kind,
                })
                .collect(),
            bandwidth_class: None,
            asic_class: None,
            buffer_class: None,
            table_scale_class: None,
            telemetry_class: None,
        }
    }
}

pub(crate) fn store_from_raw(raw: RawInventory) -> InventoryStore {
    let mut store = InventoryStore::new();
    for device in raw.devices {
        store.add(device.into_record());
    }
    store
}

pub(crate) fn parse_inventory_json(payload: &[u8]) -> Result<InventoryStore> {
    let raw: RawInventory = serde_json::from_slice(payload)?;
    Ok(store_from_raw(raw))
}

/// Load inventory from a local JSON file.
#[derive(Debug, Clone)]
pub struct StaticInventorySource {
    path: PathBuf,
}

impl StaticInventorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl InventorySource for StaticInventorySource {
    async fn load(&self) -> Result<InventoryStore> {
        let payload = tokio::fs::read(&self.path).await?;
        let store = parse_inventory_json(&payload)?;
        tracing::debug!(
            path = %self.path.display(),
            devices = store.len(),
            "loaded static inventory"
        );
        Ok(store)
    }
}
