//! Inventory error types.

use thiserror::Error;

/// Errors raised while loading or normalizing inventory.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Underlying file read failed.
    #[error("inventory I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload was not valid JSON or violated the device schema.
    #[error("inventory schema error: {0}")]
    Schema(#[from] serde_json::Error),

    /// HTTP fetch from a remote source failed.
    #[error("inventory fetch error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
