//! MCP error types.

use thiserror::Error;

/// A request or response failed schema or authentication validation.
///
/// The message is safe to return to the caller; nothing internal leaks
/// through it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Client-side failures talking to the evaluation service.
///
/// Every variant makes the engine fall back to the local risk assessor.
#[derive(Debug, Error)]
pub enum McpClientError {
    /// Transport failure or timeout.
    #[error("mcp transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response envelope failed validation.
    #[error("mcp protocol error: {0}")]
    Protocol(#[from] ValidationError),

    /// The service answered with an error envelope.
    #[error("mcp evaluation rejected: {code}: {message}")]
    Rejected { code: String, message: String },
}
