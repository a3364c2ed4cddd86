//! Verb dispatch against a single fixed endpoint.
//!
//! # Design
//! A `Transport` is bound to one endpoint for its whole life and does no
//! validation: whatever the executor returns, success or failure, goes
//! straight back to the caller. Payloads are encoded by a pluggable
//! [`JsonEncoder`] so callers can control how values are rendered.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};

/// Renders a JSON value into a request body.
pub trait JsonEncoder: Send + Sync {
    fn encode(&self, payload: &Value) -> Result<String>;
}

/// Compact `serde_json` encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonEncoder;

impl JsonEncoder for SerdeJsonEncoder {
    fn encode(&self, payload: &Value) -> Result<String> {
        serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Issues requests to a fixed endpoint.
#[derive(Clone)]
pub struct Transport {
    endpoint: String,
    executor: Arc<dyn HttpExecutor>,
    encoder: Arc<dyn JsonEncoder>,
}

impl Transport {
    /// Transport using a fresh [`UreqExecutor`] and [`SerdeJsonEncoder`].
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_parts(
            endpoint,
            Arc::new(UreqExecutor::new()),
            Arc::new(SerdeJsonEncoder),
        )
    }

    pub fn with_parts(
        endpoint: impl Into<String>,
        executor: Arc<dyn HttpExecutor>,
        encoder: Arc<dyn JsonEncoder>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            executor,
            encoder,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn get(
        &self,
        headers: Option<&[(String, String)]>,
        query: Option<&[(String, String)]>,
    ) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Get, headers, query, None)
    }

    /// Encode `payload` (or `{}` when absent) and POST it as the body.
    pub fn post(
        &self,
        headers: Option<&[(String, String)]>,
        query: Option<&[(String, String)]>,
        payload: Option<&Value>,
    ) -> Result<HttpResponse> {
        let body = self.encode(payload)?;
        self.dispatch(HttpMethod::Post, headers, query, Some(body))
    }

    /// Same contract as [`Transport::post`] with the PUT verb.
    pub fn put(
        &self,
        headers: Option<&[(String, String)]>,
        query: Option<&[(String, String)]>,
        payload: Option<&Value>,
    ) -> Result<HttpResponse> {
        let body = self.encode(payload)?;
        self.dispatch(HttpMethod::Put, headers, query, Some(body))
    }

    pub fn delete(
        &self,
        headers: Option<&[(String, String)]>,
        query: Option<&[(String, String)]>,
    ) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Delete, headers, query, None)
    }

    pub fn options(
        &self,
        headers: Option<&[(String, String)]>,
        query: Option<&[(String, String)]>,
    ) -> Result<HttpResponse> {
        self.dispatch(HttpMethod::Options, headers, query, None)
    }

    fn encode(&self, payload: Option<&Value>) -> Result<String> {
        match payload {
            Some(payload) => self.encoder.encode(payload),
            None => self.encoder.encode(&Value::Object(Default::default())),
        }
    }

    fn dispatch(
        &self,
        method: HttpMethod,
        headers: Option<&[(String, String)]>,
        query: Option<&[(String, String)]>,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        tracing::debug!(method = method.as_str(), url = %self.endpoint, "sending request");
        let request = HttpRequest {
            method,
            url: self.endpoint.clone(),
            headers: headers.map(<[_]>::to_vec).unwrap_or_default(),
            query: query.map(<[_]>::to_vec).unwrap_or_default(),
            body,
        };
        self.executor.execute(request)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
