//! Authenticated client for envelope-style JSON APIs.
//!
//! # Design
//! `Api` holds only the immutable [`ApiConfig`] plus shared handles to the
//! executor and encoder. Every call builds a fresh [`Transport`] bound to the
//! full URL, performs one round-trip, then runs the envelope pipeline:
//! extract envelope, validate status, extract results. Validation always
//! runs before extraction, so a rejected envelope never yields data.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::envelope::{extract_envelope, extract_results, validate_status};
use crate::error::{ApiError, Result};
use crate::http::{HttpExecutor, UreqExecutor};
use crate::transport::{JsonEncoder, SerdeJsonEncoder, Transport};

/// Client for an API that wraps every response in a status envelope.
#[derive(Clone)]
pub struct Api {
    config: ApiConfig,
    executor: Arc<dyn HttpExecutor>,
    encoder: Arc<dyn JsonEncoder>,
}

impl Api {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_executor(config, Arc::new(UreqExecutor::new()))
    }

    pub fn with_executor(config: ApiConfig, executor: Arc<dyn HttpExecutor>) -> Self {
        Self::with_parts(config, executor, Arc::new(SerdeJsonEncoder))
    }

    pub fn with_parts(
        config: ApiConfig,
        executor: Arc<dyn HttpExecutor>,
        encoder: Arc<dyn JsonEncoder>,
    ) -> Self {
        Self {
            config,
            executor,
            encoder,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// GET `endpoint + path` and return the envelope's `results`.
    ///
    /// `path` is appended verbatim; include the leading slash.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let envelope = self.perform_get(&self.url(path), None)?;
        validate_status(&envelope)?;
        Ok(extract_results(&envelope))
    }

    /// Like [`Api::get`], with url parameters appended to the request.
    pub fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<Value>> {
        let query = owned_pairs(query);
        let envelope = self.perform_get(&self.url(path), Some(query.as_slice()))?;
        validate_status(&envelope)?;
        Ok(extract_results(&envelope))
    }

    /// POST `payload` as JSON to `endpoint + path` and return the envelope's
    /// `results`.
    pub fn post<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<Option<Value>> {
        let payload =
            serde_json::to_value(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let envelope = self.perform_post(&self.url(path), None, &payload)?;
        validate_status(&envelope)?;
        Ok(extract_results(&envelope))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn transport(&self, url: String) -> Transport {
        Transport::with_parts(url, self.executor.clone(), self.encoder.clone())
    }

    fn base_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("key".to_string(), self.config.api_key.clone()),
        ]
    }

    fn perform_get(&self, url: &str, query: Option<&[(String, String)]>) -> Result<Value> {
        let headers = self.base_headers();
        let response = self.transport(url.to_string()).get(Some(headers.as_slice()), query)?;
        extract_envelope(&response.json()?, &self.config.key_list)
    }

    fn perform_post(
        &self,
        url: &str,
        query: Option<&[(String, String)]>,
        payload: &Value,
    ) -> Result<Value> {
        let mut headers = self.base_headers();
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        headers.push(("charset".to_string(), "utf8".to_string()));
        let response = self
            .transport(url.to_string())
            .post(Some(headers.as_slice()), query, Some(payload))?;
        extract_envelope(&response.json()?, &self.config.key_list)
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
