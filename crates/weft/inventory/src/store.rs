//! In-memory device registry.
//!
//! A stable internal representation that does not leak external schemas
//! into the engine. Enough for graph building, planner context, guard
//! evaluation, and executor targeting.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use weft_types::DeviceRecord;

/// Device registry keyed by device name.
///
/// Device names are unique; `add` replaces an existing record with the same
/// name. Iteration order is insertion order so downstream outputs stay
/// deterministic for a given source.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    devices: indexmap::IndexMap<String, DeviceRecord>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a device record.
    pub fn add(&mut self, device: DeviceRecord) {
        self.devices.insert(device.name.clone(), device);
    }

    /// Return the device record for a name, if present.
    pub fn get(&self, name: &str) -> Option<&DeviceRecord> {
        self.devices.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// Iterate all device records in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.devices.values()
    }

    /// Sorted device names, for deterministic outputs.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.devices.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// Wire shape is `{"devices": [...]}` on both sides, matching the source file
// format and the RPC inventory projection.

impl Serialize for InventoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            devices: Vec<&'a DeviceRecord>,
        }
        Wire {
            devices: self.devices.values().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InventoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(default)]
            devices: Vec<DeviceRecord>,
        }
        let wire = Wire::deserialize(deserializer)?;
        let mut store = InventoryStore::new();
        for device in wire.devices {
            store.add(device);
        }
        Ok(store)
    }
}
