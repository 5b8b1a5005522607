//! MCP client used by the orchestration engine.

use crate::audit::{AuditEvent, AuditLogger};
use crate::codec::decode_response;
use crate::error::{McpClientError, ValidationError};
use crate::schema::{ApiVersion, McpRequest, METHOD_EVALUATE_PLAN};
use crate::security::{compute_signature, McpAuthConfig};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use weft_inventory::InventoryStore;
use weft_planner::RiskAssessment;
use weft_types::ChangePlan;

/// Signed HTTP client for the plan-evaluation endpoint.
///
/// Every call sends a fresh nonce and timestamp; the caller's audit logger,
/// when configured, receives one event per request. Secrets never appear in
/// logs or errors.
pub struct McpClient {
    base_url: String,
    auth: McpAuthConfig,
    timeout: Duration,
    http: reqwest::Client,
    audit: Option<Arc<AuditLogger>>,
}

impl McpClient {
    pub fn new(base_url: impl Into<String>, auth: McpAuthConfig) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            timeout: Duration::from_secs(5),
            http: reqwest::Client::new(),
            audit: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_audit(mut self, audit: Arc<AuditLogger>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Ask the service to evaluate a plan against an inventory.
    ///
    /// Any failure here is a signal for the engine to fall back to the
    /// local risk assessor, never to skip assessment.
    pub async fn evaluate_plan(
        &self,
        plan: &ChangePlan,
        inventory: &InventoryStore,
    ) -> Result<RiskAssessment, McpClientError> {
        let started = Instant::now();
        let request_id = plan.plan_id.clone();

        let mut params = Map::new();
        params.insert("plan".to_string(), to_json(plan)?);
        params.insert("inventory".to_string(), to_json(inventory)?);

        let request = McpRequest {
            api_version: ApiVersion::V1,
            request_id: request_id.clone(),
            method: METHOD_EVALUATE_PLAN.to_string(),
            params,
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| ValidationError::new(format!("request encode failed: {e}")))
            .map_err(McpClientError::Protocol)?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let signature = compute_signature(&self.auth.hmac_secret, &timestamp, &nonce, &body);

        let url = format!("{}/mcp", self.base_url.trim_end_matches('/'));
        let outcome = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.auth.auth_token))
            .header("X-MCP-Timestamp", &timestamp)
            .header("X-MCP-Nonce", &nonce)
            .header("X-MCP-Signature", &signature)
            .body(body)
            .send()
            .await;

        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                self.log(&request_id, 0, "error", "transport", &error.to_string(), started)
                    .await;
                return Err(McpClientError::Transport(error));
            }
        };

        let status = response.status().as_u16();
        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(error) => {
                self.log(&request_id, status, "error", "transport", &error.to_string(), started)
                    .await;
                return Err(McpClientError::Transport(error));
            }
        };

        let envelope = match decode_response(&payload) {
            Ok(envelope) => envelope,
            Err(error) => {
                self.log(&request_id, status, "error", "protocol", &error.0, started)
                    .await;
                return Err(McpClientError::Protocol(error));
            }
        };

        if !envelope.ok {
            let (code, message) = envelope
                .error
                .map(|e| (e.code.to_string(), e.message))
                .unwrap_or_else(|| ("unknown".to_string(), "unknown mcp error".to_string()));
            self.log(&request_id, status, "reject", &code, &message, started)
                .await;
            return Err(McpClientError::Rejected { code, message });
        }

        let result = envelope.result.unwrap_or_default();
        let assessment: RiskAssessment = match serde_json::from_value(Value::Object(result)) {
            Ok(assessment) => assessment,
            Err(error) => {
                let error = ValidationError::new(format!("malformed evaluation result: {error}"));
                self.log(&request_id, status, "error", "protocol", &error.0, started)
                    .await;
                return Err(McpClientError::Protocol(error));
            }
        };

        self.log(&request_id, status, "ok", "", "", started).await;
        Ok(assessment)
    }

    async fn log(
        &self,
        request_id: &str,
        http_status: u16,
        outcome: &str,
        error_code: &str,
        error_message: &str,
        started: Instant,
    ) {
        if let Some(audit) = &self.audit {
            audit
                .log(&AuditEvent {
                    request_id: request_id.to_string(),
                    method: METHOD_EVALUATE_PLAN.to_string(),
                    http_status,
                    outcome: outcome.to_string(),
                    error_code: error_code.to_string(),
                    error_message: error_message.to_string(),
                    duration_ms: started.elapsed().as_millis() as u64,
                    path: "/mcp".to_string(),
                })
                .await;
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, McpClientError> {
    serde_json::to_value(value)
        .map_err(|e| McpClientError::Protocol(ValidationError::new(format!("encode failed: {e}"))))
}
