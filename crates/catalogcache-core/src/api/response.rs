use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result envelope returned by the request client for every call.
///
/// `success: false` is a normal outcome carrying the backend's message;
/// transport failures are reported as `Err` by the client instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Whether a decoded body is already in envelope form.
    pub fn is_envelope(body: &Value) -> bool {
        body.get("success").map(Value::is_boolean).unwrap_or(false)
    }
}
