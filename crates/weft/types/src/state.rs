//! Observed-state and snapshot maps shared by the executor and verifier.
//!
//! "Path not present" must stay distinguishable from "path present with a
//! null value": a path a device never had is simply absent from these maps.
//! Executors must not insert `Value::Null` placeholders for missing priors;
//! the rollback builder relies on absence to know a path cannot be restored.

use indexmap::IndexMap;
use serde_json::Value;

/// Per-device state: model path to value.
pub type DeviceState = IndexMap<String, Value>;

/// Fabric-wide state: device name to per-device state.
///
/// Used for both pre-change snapshots and post-apply observed state; both
/// live only for the duration of a single run.
pub type FabricState = IndexMap<String, DeviceState>;
