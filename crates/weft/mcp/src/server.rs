//! MCP server: authenticated `POST /mcp` endpoint.
//!
//! Request handling order matters: caller identity first, then freshness
//! (timestamp), then uniqueness (nonce), then integrity (signature), and
//! only then is the body parsed. Every exchange lands in the audit log,
//! including rejected ones.

use crate::audit::{AuditEvent, AuditLogger};
use crate::codec::decode_request;
use crate::error::ValidationError;
use crate::replay::NonceStore;
use crate::schema::{ApiVersion, ErrorCode, McpResponse, METHOD_EVALUATE_PLAN};
use crate::security::{compute_signature, constant_time_equal, parse_bearer_token, McpAuthConfig};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;
use weft_planner::RiskAssessment;

/// Server-side evaluation hook.
///
/// Receives the JSON projections of the plan and inventory exactly as the
/// caller sent them. Implementations must not mutate the plan; they only
/// judge it.
pub trait EvaluatePlan: Send + Sync {
    fn evaluate_plan(
        &self,
        plan: &Map<String, Value>,
        inventory: &Map<String, Value>,
    ) -> RiskAssessment;
}

/// Stock evaluator used until an operator binds real policy logic.
///
/// Deliberately conservative: everything is high risk and needs approval,
/// so a misconfigured deployment fails safe.
pub struct ConservativeEvaluator;

impl EvaluatePlan for ConservativeEvaluator {
    fn evaluate_plan(
        &self,
        _plan: &Map<String, Value>,
        _inventory: &Map<String, Value>,
    ) -> RiskAssessment {
        RiskAssessment {
            risk_level: weft_types::RiskLevel::High,
            blast_radius_score: 100,
            requires_approval: true,
            reasons: vec!["server adapter not yet bound to internal risk logic".to_string()],
            evidence: Map::new(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    pub auth: McpAuthConfig,
    pub audit_path: PathBuf,
    pub nonce_ttl_seconds: u64,
}

impl McpServerConfig {
    pub fn new(auth: McpAuthConfig) -> Self {
        Self {
            auth,
            audit_path: PathBuf::from("var/audit/mcp_audit.jsonl"),
            nonce_ttl_seconds: 300,
        }
    }

    pub fn with_audit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_path = path.into();
        self
    }

    pub fn with_nonce_ttl_seconds(mut self, seconds: u64) -> Self {
        self.nonce_ttl_seconds = seconds;
        self
    }
}

#[derive(Clone)]
struct AppState {
    config: Arc<McpServerConfig>,
    nonces: Arc<NonceStore>,
    audit: Arc<AuditLogger>,
    evaluator: Arc<dyn EvaluatePlan>,
}

/// Build the MCP router. `/mcp` is the only valid endpoint; everything else
/// answers 404 with a `not_found` envelope.
pub fn mcp_router(config: McpServerConfig, evaluator: Arc<dyn EvaluatePlan>) -> Router {
    let state = AppState {
        nonces: Arc::new(NonceStore::new(Duration::from_secs(config.nonce_ttl_seconds))),
        audit: Arc::new(AuditLogger::new(&config.audit_path)),
        config: Arc::new(config),
        evaluator,
    };

    Router::new()
        .route("/mcp", post(handle_mcp))
        .fallback(unknown_endpoint)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the task is cancelled.
pub async fn serve(
    addr: SocketAddr,
    config: McpServerConfig,
    evaluator: Arc<dyn EvaluatePlan>,
) -> std::io::Result<()> {
    let router = mcp_router(config, evaluator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "mcp server listening");
    axum::serve(listener, router).await
}

async fn unknown_endpoint() -> Response {
    let response = McpResponse::error(ApiVersion::V1, "unknown", ErrorCode::NotFound, "unknown endpoint");
    (StatusCode::NOT_FOUND, Json(response)).into_response()
}

/// Outcome of one processed request, carried into the audit record.
struct Processed {
    status: StatusCode,
    response: McpResponse,
    outcome: &'static str,
    error_code: String,
    error_message: String,
    request_id: String,
    method: String,
}

impl Processed {
    fn rejected(status: StatusCode, request_id: &str, method: &str, code: ErrorCode, message: &str) -> Self {
        Self {
            status,
            response: McpResponse::error(ApiVersion::V1, request_id, code, message),
            outcome: "reject",
            error_code: code.to_string(),
            error_message: message.to_string(),
            request_id: request_id.to_string(),
            method: method.to_string(),
        }
    }
}

async fn handle_mcp(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let start = Instant::now();
    let processed = process(&state, &headers, &body);

    state
        .audit
        .log(&AuditEvent {
            request_id: processed.request_id.clone(),
            method: processed.method.clone(),
            http_status: processed.status.as_u16(),
            outcome: processed.outcome.to_string(),
            error_code: processed.error_code.clone(),
            error_message: processed.error_message.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
            path: "/mcp".to_string(),
        })
        .await;

    (processed.status, Json(processed.response)).into_response()
}

fn process(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Processed {
    // Identity, freshness, uniqueness, integrity; request_id is unknown
    // until the envelope is decoded.
    if let Err(failure) = authorize(state, headers, body) {
        return Processed::rejected(
            StatusCode::BAD_REQUEST,
            "unknown",
            "unknown",
            failure.code,
            &failure.message,
        );
    }

    let payload: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => {
            return Processed::rejected(
                StatusCode::BAD_REQUEST,
                "unknown",
                "unknown",
                ErrorCode::ValidationError,
                "body must be valid json",
            );
        }
    };

    let request = match decode_request(&payload) {
        Ok(request) => request,
        Err(error) => {
            return Processed::rejected(
                StatusCode::BAD_REQUEST,
                "unknown",
                "unknown",
                ErrorCode::ValidationError,
                &error.0,
            );
        }
    };

    if request.method != METHOD_EVALUATE_PLAN {
        return Processed::rejected(
            StatusCode::BAD_REQUEST,
            &request.request_id,
            &request.method,
            ErrorCode::UnsupportedMethod,
            "method not supported",
        );
    }

    let plan = request.params.get("plan").and_then(Value::as_object);
    let inventory = request.params.get("inventory").and_then(Value::as_object);
    let (plan, inventory) = match (plan, inventory) {
        (Some(plan), Some(inventory)) => (plan, inventory),
        (None, _) => {
            return Processed::rejected(
                StatusCode::BAD_REQUEST,
                &request.request_id,
                &request.method,
                ErrorCode::ValidationError,
                "params.plan must be an object",
            );
        }
        (_, None) => {
            return Processed::rejected(
                StatusCode::BAD_REQUEST,
                &request.request_id,
                &request.method,
                ErrorCode::ValidationError,
                "params.inventory must be an object",
            );
        }
    };

    let assessment = state.evaluator.evaluate_plan(plan, inventory);
    let result = match serde_json::to_value(&assessment) {
        Ok(Value::Object(map)) => map,
        _ => {
            return Processed {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                response: McpResponse::error(
                    ApiVersion::V1,
                    &request.request_id,
                    ErrorCode::ServerError,
                    "internal error",
                ),
                outcome: "error",
                error_code: ErrorCode::ServerError.to_string(),
                error_message: "internal error".to_string(),
                request_id: request.request_id.clone(),
                method: request.method.clone(),
            };
        }
    };

    Processed {
        status: StatusCode::OK,
        response: McpResponse::ok(request.api_version, &request.request_id, result),
        outcome: "ok",
        error_code: String::new(),
        error_message: String::new(),
        request_id: request.request_id,
        method: request.method,
    }
}

struct AuthFailure {
    code: ErrorCode,
    message: String,
}

impl AuthFailure {
    fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationError,
            message: message.into(),
        }
    }
}

fn require_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ValidationError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ValidationError::new(format!("missing header {name}")))
}

fn authorize(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Result<(), AuthFailure> {
    let auth = &state.config.auth;

    let auth_header = require_header(headers, "Authorization")
        .map_err(|e| AuthFailure::validation(e.0.clone()))?;
    let token = parse_bearer_token(auth_header).map_err(|e| AuthFailure {
        code: ErrorCode::Unauthorized,
        message: e.0,
    })?;
    if !constant_time_equal(token, &auth.auth_token) {
        return Err(AuthFailure {
            code: ErrorCode::Unauthorized,
            message: "unauthorized".to_string(),
        });
    }

    let timestamp = require_header(headers, "X-MCP-Timestamp")
        .map_err(|e| AuthFailure::validation(e.0.clone()))?;
    let nonce = require_header(headers, "X-MCP-Nonce")
        .map_err(|e| AuthFailure::validation(e.0.clone()))?;
    let signature = require_header(headers, "X-MCP-Signature")
        .map_err(|e| AuthFailure::validation(e.0.clone()))?;

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| AuthFailure::validation("timestamp must be unix seconds"))?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > auth.allowed_clock_skew_seconds {
        return Err(AuthFailure::validation("timestamp outside allowed skew window"));
    }

    if state.nonces.seen_recently(nonce) {
        return Err(AuthFailure::validation("replay detected"));
    }

    let expected = compute_signature(&auth.hmac_secret, timestamp, nonce, body);
    if !constant_time_equal(signature, &expected) {
        return Err(AuthFailure::validation("invalid signature"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::McpRequest;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    const TOKEN: &str = "test-token";
    const SECRET: &str = "test-secret";

    fn test_router(audit_dir: &std::path::Path) -> Router {
        let config = McpServerConfig::new(McpAuthConfig::new(TOKEN, SECRET))
            .with_audit_path(audit_dir.join("audit.jsonl"));
        mcp_router(config, Arc::new(ConservativeEvaluator))
    }

    fn request_body() -> Vec<u8> {
        let request = McpRequest {
            api_version: ApiVersion::V1,
            request_id: "r1".to_string(),
            method: METHOD_EVALUATE_PLAN.to_string(),
            params: serde_json::from_value(serde_json::json!({
                "plan": {"plan_id": "p1", "actions": []},
                "inventory": {"devices": []},
            }))
            .unwrap(),
        };
        serde_json::to_vec(&request).unwrap()
    }

    struct Signed {
        timestamp: String,
        nonce: String,
        signature: String,
        body: Vec<u8>,
    }

    fn sign(body: Vec<u8>, ts_offset: i64, nonce: &str) -> Signed {
        let timestamp = (chrono::Utc::now().timestamp() + ts_offset).to_string();
        let signature = compute_signature(SECRET, &timestamp, nonce, &body);
        Signed {
            timestamp,
            nonce: nonce.to_string(),
            signature,
            body,
        }
    }

    fn http_request(signed: &Signed, token: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .header("X-MCP-Timestamp", &signed.timestamp)
            .header("X-MCP-Nonce", &signed.nonce)
            .header("X-MCP-Signature", &signed.signature)
            .body(Body::from(signed.body.clone()))
            .unwrap()
    }

    async fn response_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn signed_request_evaluates_plan() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());
        let signed = sign(request_body(), 0, "nonce-ok");

        let response = router.oneshot(http_request(&signed, TOKEN)).await.unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["request_id"], "r1");
        assert_eq!(body["result"]["risk_level"], "high");
        assert_eq!(body["result"]["blast_radius_score"], 100);
        assert_eq!(body["result"]["requires_approval"], true);
        assert_eq!(body["result"]["evidence"], serde_json::json!({}));

        let audit = std::fs::read_to_string(dir.path().join("audit.jsonl")).unwrap();
        let event: Value = serde_json::from_str(audit.lines().next().unwrap()).unwrap();
        assert_eq!(event["outcome"], "ok");
        assert_eq!(event["http_status"], 200);
    }

    #[tokio::test]
    async fn wrong_token_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());
        let signed = sign(request_body(), 0, "nonce-token");

        let response = router
            .oneshot(http_request(&signed, "wrong-token"))
            .await
            .unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn timestamp_just_outside_skew_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());
        let signed = sign(request_body(), -61, "nonce-skew");

        let response = router.oneshot(http_request(&signed, TOKEN)).await.unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("skew window"));
    }

    #[tokio::test]
    async fn timestamp_inside_skew_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());
        let signed = sign(request_body(), -59, "nonce-inside");

        let response = router.oneshot(http_request(&signed, TOKEN)).await.unwrap();
        let (status, _) = response_json(response).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn replayed_nonce_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());

        let first = sign(request_body(), 0, "nonce-replay");
        let response = router
            .clone()
            .oneshot(http_request(&first, TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let second = sign(request_body(), 0, "nonce-replay");
        let response = router.oneshot(http_request(&second, TOKEN)).await.unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("replay"));
    }

    #[tokio::test]
    async fn tampered_body_fails_signature_check() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());

        // Sign one body, send another.
        let mut signed = sign(request_body(), 0, "nonce-tamper");
        signed.body = serde_json::to_vec(&serde_json::json!({
            "api_version": "v1",
            "request_id": "evil",
            "method": "evaluate_plan",
            "params": {"plan": {}, "inventory": {}}
        }))
        .unwrap();

        let response = router.oneshot(http_request(&signed, TOKEN)).await.unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("signature"));
    }

    #[tokio::test]
    async fn unknown_method_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());

        let body = serde_json::to_vec(&serde_json::json!({
            "api_version": "v1",
            "request_id": "r2",
            "method": "delete_fabric",
            "params": {"plan": {}, "inventory": {}}
        }))
        .unwrap();
        let signed = sign(body, 0, "nonce-method");

        let response = router.oneshot(http_request(&signed, TOKEN)).await.unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "unsupported_method");
        assert_eq!(body["request_id"], "r2");
    }

    #[tokio::test]
    async fn missing_plan_param_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());

        let body = serde_json::to_vec(&serde_json::json!({
            "api_version": "v1",
            "request_id": "r3",
            "method": "evaluate_plan",
            "params": {"inventory": {}}
        }))
        .unwrap();
        let signed = sign(body, 0, "nonce-params");

        let response = router.oneshot(http_request(&signed, TOKEN)).await.unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("params.plan"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(dir.path());

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/other")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let (status, body) = response_json(response).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }
}
