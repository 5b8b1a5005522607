//! Strict MCP envelope schemas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The only method the protocol defines today.
pub const METHOD_EVALUATE_PLAN: &str = "evaluate_plan";

/// Protocol version carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiVersion {
    #[serde(rename = "v1")]
    V1,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::V1 => write!(f, "v1"),
        }
    }
}

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    UnsupportedMethod,
    ValidationError,
    Unauthorized,
    ServerError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::UnsupportedMethod => "unsupported_method",
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::ServerError => "server_error",
        };
        write!(f, "{s}")
    }
}

/// Request envelope.
///
/// `request_id` is a stable id for tracing; `params` carry the
/// method-specific payload (JSON-safe projections of the plan and
/// inventory for `evaluate_plan`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpRequest {
    pub api_version: ApiVersion,
    pub request_id: String,
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Error body of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

/// Response envelope.
///
/// `result` is present only on success, `error` only on failure; the codec
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpResponse {
    pub api_version: ApiVersion,
    pub request_id: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<McpErrorBody>,
}

impl McpResponse {
    pub fn ok(api_version: ApiVersion, request_id: impl Into<String>, result: Map<String, Value>) -> Self {
        Self {
            api_version,
            request_id: request_id.into(),
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(
        api_version: ApiVersion,
        request_id: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            api_version,
            request_id: request_id.into(),
            ok: false,
            result: None,
            error: Some(McpErrorBody {
                code,
                message: message.into(),
                details: None,
            }),
        }
    }
}
