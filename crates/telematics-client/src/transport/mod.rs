//! Transport layer for the telematics service
//!
//! The client never talks HTTP directly. Every exchange goes through a
//! [`Transport`]: one authenticated request in, one decoded JSON object out.
//! Retry policy and any vendor envelope (encryption, signing) belong to the
//! transport implementation.
//!
//! - [`HttpTransport`] sends plain JSON over `reqwest`
//! - [`MockTransport`] records requests and replays scripted payloads for tests

pub mod error;
mod http;
pub mod mock;

pub use error::TransportError;
pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use serde_json::Value;

/// HTTP method of a service request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// One request to the service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Endpoint path relative to the service base, e.g. `remoteServices/doorLock/v4`
    pub path: &'static str,
    pub body: Option<Value>,
    /// Attach the device/app credential keys
    pub needs_keys: bool,
    /// Attach the logged-in session
    pub needs_auth: bool,
}

impl ApiRequest {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            body: None,
            needs_keys: true,
            needs_auth: true,
        }
    }

    pub fn post(path: &'static str, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            body: Some(body),
            needs_keys: true,
            needs_auth: true,
        }
    }

    /// Send without a logged-in session
    pub fn without_auth(mut self) -> Self {
        self.needs_auth = false;
        self
    }
}

/// One authenticated request/response exchange with the service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request and return the decoded JSON payload
    async fn call(&self, request: ApiRequest) -> Result<Value, TransportError>;

    /// Establish a session with the account credentials
    async fn login(&self) -> Result<(), TransportError>;

    /// Release connections and the session; later calls fail with
    /// [`TransportError::Closed`]
    async fn close(&self);
}
