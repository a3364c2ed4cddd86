//! Client configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Settings an [`Api`](crate::Api) is built from.
///
/// `key_list` is the single top-level key of the response body that holds
/// the envelope.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub key_list: String,
}

impl ApiConfig {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        key_list: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            key_list: key_list.into(),
        }
    }

    /// Build from a JSON mapping with the keys `api_key`, `endpoint` and
    /// `key_list`. Extra keys are ignored.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| ApiError::Config(e.to_string()))
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("key_list", &self.key_list)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_value_reads_all_keys() {
        let config = ApiConfig::from_value(json!({
            "api_key": "secret",
            "endpoint": "https://example.com/api",
            "key_list": "data",
            "unused": true
        }))
        .unwrap();
        assert_eq!(config, ApiConfig::new("secret", "https://example.com/api", "data"));
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = ApiConfig::from_value(json!({
            "api_key": "secret",
            "endpoint": "https://example.com/api"
        }))
        .unwrap_err();
        match err {
            ApiError::Config(msg) => assert!(msg.contains("key_list"), "{msg}"),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn from_json_str_rejects_garbage() {
        let err = ApiConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn debug_hides_api_key() {
        let config = ApiConfig::new("secret", "https://example.com/api", "data");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("https://example.com/api"));
    }
}
