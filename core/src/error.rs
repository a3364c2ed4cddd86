//! Error types for the envelope API client.
//!
//! # Design
//! Transport failures keep the original `ureq::Error` so callers see exactly
//! what the HTTP layer reported. The envelope rejections (`EmptyResponse`,
//! `MissingStatus`, `BadStatus`) are separate variants so a caller can tell
//! "the server said no" apart from "the server said nothing useful".

use serde_json::Value;

/// Errors returned by `Api` and `Transport` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP layer failed (connection refused, timeout, broken body).
    #[error("transport failure: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body could not be parsed as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is incomplete or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The parsed body does not contain the configured envelope key.
    #[error("response body has no `{key}` key")]
    MissingKey { key: String },

    /// The envelope is null or an empty object.
    #[error("response api is empty, cannot fetch the status of api")]
    EmptyResponse,

    /// The envelope has no `status` block.
    #[error("response status is not available")]
    MissingStatus,

    /// `status.code` is something other than 200.
    #[error(
        "response status not clear, an error may have occurred: {}",
        .description.as_deref().unwrap_or("no description")
    )]
    BadStatus {
        code: Option<Value>,
        description: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_status_message_includes_description() {
        let err = ApiError::BadStatus {
            code: Some(Value::from(500)),
            description: Some("quota exceeded".to_string()),
        };
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn bad_status_without_description_still_renders() {
        let err = ApiError::BadStatus {
            code: None,
            description: None,
        };
        assert!(err.to_string().ends_with("no description"));
    }

    #[test]
    fn missing_key_names_the_key() {
        let err = ApiError::MissingKey {
            key: "data".to_string(),
        };
        assert_eq!(err.to_string(), "response body has no `data` key");
    }
}
