//! Mock transport for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};

use super::{ApiRequest, Transport, TransportError};

/// Scripted outcome for one endpoint path
#[derive(Debug, Clone)]
enum MockResponse {
    Payload(Value),
    HttpError { status: u16, message: String },
    AuthError(String),
}

/// Mock transport for testing
///
/// Every request is recorded. Paths without a scripted response answer
/// `{"resultCode": "200S00"}`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: RwLock<HashMap<String, MockResponse>>,
    requests: RwLock<Vec<ApiRequest>>,
    logins: AtomicUsize,
    closed: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests to `path` with `payload`
    pub fn respond(&self, path: &str, payload: Value) -> &Self {
        self.responses
            .write()
            .insert(path.to_string(), MockResponse::Payload(payload));
        self
    }

    /// Fail requests to `path` with an HTTP error
    pub fn fail_with_status(&self, path: &str, status: u16, message: &str) -> &Self {
        self.responses.write().insert(
            path.to_string(),
            MockResponse::HttpError {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    /// Fail requests to `path` with an authentication error
    pub fn fail_auth(&self, path: &str, message: &str) -> &Self {
        self.responses
            .write()
            .insert(path.to_string(), MockResponse::AuthError(message.to_string()));
        self
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.read().clone()
    }

    /// Requests received for one path
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests
            .read()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }

    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, request: ApiRequest) -> Result<Value, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }

        let scripted = self.responses.read().get(request.path).cloned();
        self.requests.write().push(request);

        match scripted {
            None => Ok(json!({ "resultCode": "200S00" })),
            Some(MockResponse::Payload(payload)) => Ok(payload),
            Some(MockResponse::HttpError { status, message }) => {
                Err(TransportError::http(status, message))
            }
            Some(MockResponse::AuthError(message)) => Err(TransportError::Authentication(message)),
        }
    }

    async fn login(&self) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
