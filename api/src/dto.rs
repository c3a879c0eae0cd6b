//! Request and response payloads
//!
//! Missing body fields deserialize to empty strings so that the validators
//! below produce the service's own "miss required parameter" messages
//! instead of a framework-level deserialization error.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Body of POST /sms/code/send
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// 11-digit mobile number
    #[serde(default)]
    #[validate(length(min = 1, message = "miss required parameter phone"))]
    pub phone: String,

    /// Message template identifier
    #[serde(default)]
    #[validate(length(min = 1, message = "miss required parameter template_code"))]
    pub template_code: String,
}

/// Body of POST /sms/code/verify
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "miss required parameter phone"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "miss required parameter template_code"))]
    pub template_code: String,

    /// Session token returned by the send operation
    #[serde(default)]
    #[validate(length(min = 1, message = "miss required parameter token"))]
    pub token: String,

    /// Submitted verification code
    #[serde(default)]
    #[validate(length(min = 1, message = "miss required parameter code"))]
    pub code: String,
}

/// Wire envelope shared by every endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            msg: String::new(),
            data: Some(data),
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        Self::with_status("fail", msg)
    }

    pub fn with_status(status: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            msg: msg.into(),
            data: None,
        }
    }
}

/// A message from the validation error set (deterministic whenever a single
/// field failed)
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, errors)| errors.iter())
        .filter_map(|e| e.message.as_ref())
        .map(|m| m.to_string())
        .next()
        .unwrap_or_else(|| "invalid request".to_string())
}
