//! Executor error types.

use thiserror::Error;
use weft_types::FabricState;

/// Failure reported by a device client.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Failure of a plan apply.
///
/// Carries whatever pre-snapshot was captured before the failure so the
/// caller can still attempt rollback of partially applied paths.
#[derive(Debug, Error)]
#[error("execution failed: {message}")]
pub struct ExecutorError {
    pub message: String,
    pub pre_snapshot: FabricState,
}

impl ExecutorError {
    pub fn new(message: impl Into<String>, pre_snapshot: FabricState) -> Self {
        Self {
            message: message.into(),
            pre_snapshot,
        }
    }
}

/// Result type for plan application.
pub type Result<T> = std::result::Result<T, ExecutorError>;
