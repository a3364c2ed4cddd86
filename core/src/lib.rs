//! Synchronous client for JSON APIs that wrap every response in a status
//! envelope.
//!
//! # Overview
//! A response body looks like `{"<key_list>": {"status": {"code": 200,
//! "description": "..."}, "results": ...}}`. [`Api`] sends authenticated
//! GET/POST requests, checks the status block and hands back `results`.
//! [`Transport`] underneath it dispatches any of the five verbs to one fixed
//! endpoint without interpreting the response.
//!
//! # Design
//! - `Api` is stateless between calls; it holds only the immutable config.
//! - The network sits behind [`HttpExecutor`], so tests can capture requests
//!   without a server. [`UreqExecutor`] is the blocking default.
//! - Envelope rejections are distinct [`ApiError`] variants rather than
//!   panics, so callers decide how fatal they are.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;

pub use client::Api;
pub use config::ApiConfig;
pub use envelope::{Status, SUCCESS_CODE};
pub use error::{ApiError, Result};
pub use http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse, UreqExecutor};
pub use transport::{JsonEncoder, SerdeJsonEncoder, Transport};
