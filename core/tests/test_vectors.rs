//! Run the envelope pipeline against JSON vectors stored in `test-vectors/`.
//!
//! Each case gives a response body and either the expected `results` or the
//! expected error variant. Every case is checked twice: through the bare
//! envelope functions and through `Api::get` with a canned executor.

use std::sync::Arc;

use serde_json::Value;

use envelope_core::envelope::{extract_envelope, extract_results, validate_status};
use envelope_core::{Api, ApiConfig, ApiError, HttpExecutor, HttpRequest, HttpResponse};

struct CannedExecutor(String);

impl HttpExecutor for CannedExecutor {
    fn execute(&self, _request: HttpRequest) -> envelope_core::Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: self.0.clone(),
        })
    }
}

fn pipeline(body: &Value, key: &str) -> Result<Option<Value>, ApiError> {
    let envelope = extract_envelope(body, key)?;
    validate_status(&envelope)?;
    Ok(extract_results(&envelope))
}

fn check(name: &str, case: &Value, result: Result<Option<Value>, ApiError>) {
    match case.get("expected_error").and_then(Value::as_str) {
        Some(expected) => {
            let err = result.unwrap_err();
            let matched = match expected {
                "EmptyResponse" => matches!(err, ApiError::EmptyResponse),
                "MissingStatus" => matches!(err, ApiError::MissingStatus),
                "BadStatus" => matches!(err, ApiError::BadStatus { .. }),
                "MissingKey" => matches!(err, ApiError::MissingKey { .. }),
                other => panic!("{name}: unknown expected_error: {other}"),
            };
            assert!(matched, "{name}: expected {expected}, got {err:?}");
            if let Some(message) = case.get("expected_message").and_then(Value::as_str) {
                assert!(err.to_string().contains(message), "{name}: message {err}");
            }
        }
        None => {
            let results = result.unwrap();
            let expected = match &case["expected_results"] {
                Value::Null => None,
                other => Some(other.clone()),
            };
            assert_eq!(results, expected, "{name}: results");
        }
    }
}

#[test]
fn envelope_test_vectors() {
    let raw = include_str!("../../test-vectors/envelopes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let key = vectors["key_list"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        check(name, case, pipeline(&case["body"], key));
    }
}

#[test]
fn envelope_test_vectors_through_api() {
    let raw = include_str!("../../test-vectors/envelopes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let key = vectors["key_list"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let api = Api::with_executor(
            ApiConfig::new("k", "http://localhost:3000", key),
            Arc::new(CannedExecutor(case["body"].to_string())),
        );
        check(name, case, api.get("/anything"));
    }
}
