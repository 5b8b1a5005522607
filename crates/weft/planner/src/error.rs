//! Planner error types.

use thiserror::Error;

/// Reasons the planner rejects an intent.
///
/// These are never retried; the engine surfaces them as a planning alert
/// before anything touches a device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The desired payload did not match an accepted shape.
    #[error("invalid intent: {0}")]
    InvalidIntent(String),

    /// The intent referenced devices the inventory does not know.
    /// The list is sorted and deduplicated.
    #[error("plan references devices not present in inventory: {}", .0.join(", "))]
    UnknownDevices(Vec<String>),
}

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;
