//! MCP: the authenticated plan-evaluation RPC between the engine and an
//! external policy service.
//!
//! A narrow request/response protocol over `POST /mcp`. Every request is
//! authenticated with a bearer token and integrity-protected with a
//! timestamped, nonce-guarded HMAC signature; the server keeps an
//! append-only JSONL audit trail of every exchange.
//!
//! The protocol is a hook, not a planner: a service may substitute its
//! judgment for the local risk heuristic, but it never mutates the plan,
//! and the engine always keeps the local assessor as fallback.

pub mod audit;
pub mod client;
pub mod codec;
pub mod error;
pub mod replay;
pub mod schema;
pub mod security;
pub mod server;

pub use audit::{AuditEvent, AuditLogger};
pub use client::McpClient;
pub use error::{McpClientError, ValidationError};
pub use replay::NonceStore;
pub use schema::{ApiVersion, ErrorCode, McpErrorBody, McpRequest, McpResponse, METHOD_EVALUATE_PLAN};
pub use security::{compute_signature, constant_time_equal, parse_bearer_token, McpAuthConfig};
pub use server::{mcp_router, serve, ConservativeEvaluator, EvaluatePlan, McpServerConfig};
