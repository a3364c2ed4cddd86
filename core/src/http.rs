//! HTTP request/response data and the executor seam.
//!
//! # Design
//! Requests and responses are plain data. `Transport` builds an
//! `HttpRequest` and hands it to an `HttpExecutor`, which performs the actual
//! round-trip. The default executor is a blocking `ureq` agent; tests swap in
//! a recording executor to inspect exactly what would go on the wire.
//!
//! All fields use owned types (`String`, `Vec`) so values can be captured and
//! compared without lifetime concerns.

use serde_json::Value;

use crate::error::{ApiError, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `query` holds url parameters in the order they were supplied. An empty
/// `query` means no url parameters are appended at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Performs one HTTP round-trip.
///
/// Implementations must not interpret the status code: a 4xx/5xx response is
/// still an `Ok(HttpResponse)`. Only failures to complete the exchange are
/// errors.
pub trait HttpExecutor: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Blocking [`HttpExecutor`] backed by a [`ureq::Agent`].
///
/// No timeout is configured; use [`UreqExecutor::from_agent`] to supply an
/// agent with the limits the caller needs.
#[derive(Debug, Clone)]
pub struct UreqExecutor {
    agent: ureq::Agent,
}

impl UreqExecutor {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            // Status interpretation happens on the envelope, not the status line.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap an existing agent. The agent should have
    /// `http_status_as_error(false)` or error statuses surface as transport
    /// failures.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpExecutor for UreqExecutor {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            query,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => decorate(self.agent.get(&url), &headers, &query).call(),
            HttpMethod::Delete => decorate(self.agent.delete(&url), &headers, &query).call(),
            HttpMethod::Options => decorate(self.agent.options(&url), &headers, &query).call(),
            HttpMethod::Post => send(decorate(self.agent.post(&url), &headers, &query), body),
            HttpMethod::Put => send(decorate(self.agent.put(&url), &headers, &query), body),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Flatten a header map. Values that are not valid UTF-8 are kept lossily.
fn header_pairs(headers: &ureq::http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn decorate<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
    query: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in query {
        builder = builder.query(key, value);
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Options.as_str(), "OPTIONS");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            query: Vec::new(),
            body: None,
        };
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("key"), None);
    }

    #[test]
    fn header_pairs_keep_non_ascii_values() {
        use ureq::http::{HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert("x-city", HeaderValue::from_bytes(b"caf\xc3\xa9").unwrap());
        headers.insert("x-raw", HeaderValue::from_bytes(b"a\xffb").unwrap());
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let pairs = header_pairs(&headers);
        let lookup = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(lookup("x-city"), Some("café"));
        assert_eq!(lookup("x-raw"), Some("a\u{fffd}b"));
        assert_eq!(lookup("content-type"), Some("application/json"));
    }

    #[test]
    fn json_parses_body() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"data":{"results":[1,2]}}"#.to_string(),
        };
        let value = response.json().unwrap();
        assert_eq!(value["data"]["results"][1], 2);
    }

    #[test]
    fn json_rejects_non_json_body() {
        let response = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: "<html>bad gateway</html>".to_string(),
        };
        let err = response.json().unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
