//! Strict envelope codec.
//!
//! Serde handles the field-level shape; the functions here add the envelope
//! rules serde cannot express: non-empty ids, and the mutual exclusion of
//! `result` and `error` against the `ok` flag.

use crate::error::ValidationError;
use crate::schema::{McpRequest, McpResponse};
use serde_json::Value;

/// Decode and validate a request envelope.
pub fn decode_request(payload: &Value) -> Result<McpRequest, ValidationError> {
    if !payload.is_object() {
        return Err(ValidationError::new("request must be an object"));
    }
    let request: McpRequest = serde_json::from_value(payload.clone())
        .map_err(|e| ValidationError::new(format!("malformed request envelope: {e}")))?;

    if request.request_id.is_empty() {
        return Err(ValidationError::new("request_id must be a non empty string"));
    }
    if request.method.is_empty() {
        return Err(ValidationError::new("method must be a non empty string"));
    }
    Ok(request)
}

/// Decode and validate a response envelope.
pub fn decode_response(payload: &Value) -> Result<McpResponse, ValidationError> {
    if !payload.is_object() {
        return Err(ValidationError::new("response must be an object"));
    }
    let response: McpResponse = serde_json::from_value(payload.clone())
        .map_err(|e| ValidationError::new(format!("malformed response envelope: {e}")))?;

    if response.request_id.is_empty() {
        return Err(ValidationError::new("request_id must be a non empty string"));
    }
    if response.ok {
        if response.error.is_some() {
            return Err(ValidationError::new("ok response must not include error"));
        }
    } else {
        if response.result.is_some() {
            return Err(ValidationError::new("error response must not include result"));
        }
        if response.error.is_none() {
            return Err(ValidationError::new("error response must include error"));
        }
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ApiVersion, ErrorCode, McpResponse, METHOD_EVALUATE_PLAN};
    use serde_json::{json, Map};

    #[test]
    fn request_round_trip() {
        let request = McpRequest {
            api_version: ApiVersion::V1,
            request_id: "r1".to_string(),
            method: METHOD_EVALUATE_PLAN.to_string(),
            params: Map::new(),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["api_version"], "v1");
        let decoded = decode_request(&encoded).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn response_round_trip() {
        let mut result = Map::new();
        result.insert("risk_level".to_string(), json!("high"));
        let response = McpResponse::ok(ApiVersion::V1, "r1", result);
        let encoded = serde_json::to_value(&response).unwrap();
        let decoded = decode_response(&encoded).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn unknown_api_version_is_rejected() {
        let payload = json!({
            "api_version": "v2",
            "request_id": "r1",
            "method": "evaluate_plan",
            "params": {}
        });
        assert!(decode_request(&payload).is_err());
    }

    #[test]
    fn empty_request_id_is_rejected() {
        let payload = json!({
            "api_version": "v1",
            "request_id": "",
            "method": "evaluate_plan",
            "params": {}
        });
        assert!(decode_request(&payload).is_err());
    }

    #[test]
    fn missing_params_default_to_empty() {
        let payload = json!({
            "api_version": "v1",
            "request_id": "r1",
            "method": "evaluate_plan"
        });
        let request = decode_request(&payload).unwrap();
        assert!(request.params.is_empty());
    }

    #[test]
    fn ok_response_with_error_is_rejected() {
        let payload = json!({
            "api_version": "v1",
            "request_id": "r1",
            "ok": true,
            "result": {},
            "error": {"code": "server_error", "message": "boom"}
        });
        assert!(decode_response(&payload).is_err());
    }

    #[test]
    fn error_response_with_result_is_rejected() {
        let payload = json!({
            "api_version": "v1",
            "request_id": "r1",
            "ok": false,
            "result": {},
            "error": {"code": "server_error", "message": "boom"}
        });
        assert!(decode_response(&payload).is_err());
    }

    #[test]
    fn error_response_decodes_code() {
        let payload = json!({
            "api_version": "v1",
            "request_id": "r1",
            "ok": false,
            "error": {"code": "validation_error", "message": "bad"}
        });
        let response = decode_response(&payload).unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::ValidationError);
    }
}
