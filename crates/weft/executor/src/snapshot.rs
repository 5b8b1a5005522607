//! Snapshot helpers shared by real executors and test doubles.
//!
//! These operate on the [`DeviceClient`](crate::DeviceClient) seam rather
//! than a transport library. If the client omits a path, the omission is
//! kept rather than inventing a null: missing telemetry is information.

use crate::error::TransportError;
use crate::gnmi::DeviceClient;
use weft_types::DeviceState;

/// Collect prior values for the paths a plan is about to modify.
pub async fn collect_paths_snapshot(
    client: &dyn DeviceClient,
    paths: &[String],
) -> std::result::Result<DeviceState, TransportError> {
    if paths.is_empty() {
        return Ok(DeviceState::new());
    }
    client.get(paths).await
}

/// Collect observed values after apply.
///
/// The same read as the snapshot today; kept separate so retries or
/// convergence waiting can be added on this side alone.
pub async fn collect_paths_observed(
    client: &dyn DeviceClient,
    paths: &[String],
) -> std::result::Result<DeviceState, TransportError> {
    if paths.is_empty() {
        return Ok(DeviceState::new());
    }
    client.get(paths).await
}
