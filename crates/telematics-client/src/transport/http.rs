//! Plain-JSON HTTP transport

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{ApiRequest, Transport, TransportError};
use crate::config::{Credentials, Region};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const LOGIN_PATH: &str = "user/login";

/// Transport that exchanges plain JSON with the service over HTTP
///
/// Credential keys are sent as `device-id` and `region` headers, the
/// session as a bearer token. The session is established lazily on the
/// first request that needs it and dropped when the service answers 401.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    region: Region,
    device_id: String,
    access_token: RwLock<Option<String>>,
    closed: AtomicBool,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the service (e.g., "https://relay.example.com/prod/")
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        region: Region,
    ) -> Result<Self, TransportError> {
        Self::with_config(
            base_url,
            credentials,
            region,
            DEFAULT_TIMEOUT,
            DEFAULT_CONNECT_TIMEOUT,
        )
    }

    /// Create a new transport with custom timeouts
    pub fn with_config(
        base_url: &str,
        credentials: Credentials,
        region: Region,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        // Url::join drops the last segment unless the base ends in '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        let device_id = device_id_for(&credentials.email);

        Ok(Self {
            client,
            base_url,
            credentials,
            region,
            device_id,
            access_token: RwLock::new(None),
            closed: AtomicBool::new(false),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Device identifier derived from the account email
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Whether a session is currently established
    pub fn has_session(&self) -> bool {
        self.access_token.read().is_some()
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(TransportError::Closed)
        } else {
            Ok(())
        }
    }

    async fn session_token(&self) -> Result<String, TransportError> {
        let cached = self.access_token.read().clone();
        if let Some(token) = cached {
            return Ok(token);
        }

        self.login().await?;
        self.access_token
            .read()
            .clone()
            .ok_or_else(|| TransportError::Authentication("No session after login".to_string()))
    }

    async fn decode_response(&self, response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()));
        }

        let message = match response.text().await {
            Ok(text) if !text.is_empty() => text,
            _ => format!("HTTP {}", status),
        };

        if status == StatusCode::UNAUTHORIZED {
            warn!("Session rejected by service, clearing it");
            *self.access_token.write() = None;
            return Err(TransportError::Authentication(message));
        }

        Err(TransportError::http(status.as_u16(), message))
    }
}

/// `ACCT` followed by the first 32 bits of SHA-256(email) as a decimal number
fn device_id_for(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    format!("ACCT{}", prefix)
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = ?request.method, path = request.path))]
    async fn call(&self, request: ApiRequest) -> Result<Value, TransportError> {
        self.ensure_open()?;

        let url = self.base_url.join(request.path)?;
        let mut builder = self.client.request(request.method.into(), url);

        if request.needs_keys {
            builder = builder
                .header("device-id", &self.device_id)
                .header("region", self.region.code());
        }
        if request.needs_auth {
            let token = self.session_token().await?;
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!("Sending request");
        let response = builder.send().await?;
        self.decode_response(response).await
    }

    #[instrument(skip(self))]
    async fn login(&self) -> Result<(), TransportError> {
        self.ensure_open()?;

        let url = self.base_url.join(LOGIN_PATH)?;
        let response = self
            .client
            .post(url)
            .header("device-id", &self.device_id)
            .header("region", self.region.code())
            .json(&json!({
                "email": self.credentials.email,
                "password": self.credentials.password,
            }))
            .send()
            .await?;

        let payload = self.decode_response(response).await?;
        let token = payload
            .get("accessToken")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                TransportError::Authentication("Login response has no accessToken".to_string())
            })?;

        *self.access_token.write() = Some(token.to_string());
        info!("Logged in to telematics service");
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        *self.access_token.write() = None;
        debug!("Transport closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            email: "driver@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new("http://localhost:9080", credentials(), Region::Mnao);
        assert!(transport.is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let transport = HttpTransport::new("not a url", credentials(), Region::Mnao);
        assert!(matches!(transport, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let transport =
            HttpTransport::new("http://localhost:9080/prod", credentials(), Region::Mme).unwrap();
        let url = transport.base_url().join("remoteServices/doorLock/v4").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9080/prod/remoteServices/doorLock/v4"
        );
    }

    #[test]
    fn test_device_id_is_stable_per_account() {
        let a = device_id_for("driver@example.com");
        assert_eq!(a, device_id_for("driver@example.com"));
        assert_ne!(a, device_id_for("other@example.com"));
        assert!(a.starts_with("ACCT"));
        assert!(a[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_closed_transport_rejects_calls() {
        let transport =
            HttpTransport::new("http://localhost:9080", credentials(), Region::Mnao).unwrap();
        transport.close().await;

        let result = transport
            .call(ApiRequest::get("content/getTac/v4").without_auth())
            .await;
        assert!(matches!(result, Err(TransportError::Closed)));
        assert!(!transport.has_session());
    }
}
