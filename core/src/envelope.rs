//! The response envelope contract.
//!
//! # Design
//! A response body is a JSON object; the value under the configured key is
//! the envelope. An envelope is accepted only when it carries
//! `status.code == 200`, and only then is `results` read from it. All three
//! steps are free functions over `serde_json::Value` so they can be tested
//! without any HTTP.

use serde_json::Value;

use crate::error::{ApiError, Result};

pub const SUCCESS_CODE: u16 = 200;

/// Typed view of the `status` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub code: Option<Value>,
    pub description: Option<String>,
}

impl Status {
    /// Read `code` and `description` from a status block. Anything other
    /// than an object yields an empty status.
    pub fn from_value(status: &Value) -> Self {
        let code = status.get("code").filter(|v| !v.is_null()).cloned();
        let description = status.get("description").and_then(|d| match d {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        Self { code, description }
    }

    pub fn is_success(&self) -> bool {
        self.code
            .as_ref()
            .and_then(Value::as_f64)
            .is_some_and(|code| code == f64::from(SUCCESS_CODE))
    }
}

/// Return the envelope stored under `key` in a parsed response body.
pub fn extract_envelope(body: &Value, key: &str) -> Result<Value> {
    body.get(key).cloned().ok_or_else(|| {
        tracing::warn!(key, "response body has no envelope key");
        ApiError::MissingKey {
            key: key.to_string(),
        }
    })
}

/// Check that an envelope reports success.
pub fn validate_status(envelope: &Value) -> Result<()> {
    if is_empty(envelope) {
        tracing::warn!("empty response envelope");
        return Err(ApiError::EmptyResponse);
    }

    let status = match envelope.get("status") {
        Some(status) if !status.is_null() => status,
        _ => {
            tracing::warn!("response envelope has no status");
            return Err(ApiError::MissingStatus);
        }
    };

    let status = Status::from_value(status);
    if !status.is_success() {
        tracing::warn!(
            code = ?status.code,
            description = status.description.as_deref().unwrap_or_default(),
            "response envelope reports failure"
        );
        return Err(ApiError::BadStatus {
            code: status.code,
            description: status.description,
        });
    }

    tracing::debug!("response envelope accepted");
    Ok(())
}

/// The `results` field of a validated envelope. Absent and `null` both map
/// to `None`.
pub fn extract_results(envelope: &Value) -> Option<Value> {
    envelope.get("results").filter(|v| !v.is_null()).cloned()
}

/// Falsy JSON: null, false, zero, and empty strings, arrays or objects.
fn is_empty(envelope: &Value) -> bool {
    match envelope {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
