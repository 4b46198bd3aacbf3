//! Device Gateway: typed request/response functions for each REST endpoint.
//!
//! Every request goes through [`DeviceClient::send`], which runs the
//! transport error through [`classify`] so callers only ever see
//! `ClientError::Unreachable` for network trouble. Status handling follows
//! the client's [`StatusPolicy`]; endpoints return `Ok(None)` when the
//! policy is `Absent` and the device answered with something other than 200.
//!
//! No retries and no business logic live here.

pub mod gallery;
pub mod image;
pub mod playlist;
pub mod system;

use crate::config::{DeviceSession, StatusPolicy};
use crate::utils::errors::{ClientError, Result};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// `Ok(None)` means the device replied with an unexpected status under
/// `StatusPolicy::Absent`.
pub type Reply<T> = Result<Option<T>>;

/// Collapse a transport error into the client's error taxonomy.
///
/// Connect failures, timeouts and socket/body I/O errors all become
/// `Unreachable`; only request-builder misuse and JSON decoding are reported
/// separately.
pub fn classify(host: &str, err: reqwest::Error) -> ClientError {
    if err.is_builder() {
        return ClientError::Http(err.to_string());
    }
    if err.is_decode() {
        return ClientError::Decode(root_cause(&err));
    }

    let reason = if err.is_timeout() {
        if err.is_connect() {
            "Connection timed out".to_string()
        } else {
            "Request timed out".to_string()
        }
    } else if err.is_connect() {
        format!("Connection failed: {}", root_cause(&err))
    } else {
        format!("Network error: {}", root_cause(&err))
    };

    ClientError::Unreachable {
        host: host.to_string(),
        reason,
    }
}

/// Innermost message of an error chain ("Connection refused (os error 111)"
/// rather than reqwest's generic wrapper text).
fn root_cause(err: &reqwest::Error) -> String {
    let mut current: &dyn std::error::Error = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

/// Build the HTTP client for a session.
pub(crate) fn build_http(session: &DeviceSession, timeout: std::time::Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .danger_accept_invalid_certs(!session.verify_tls)
        .build()
        .map_err(|e| ClientError::Http(e.to_string()))
}

/// Typed REST client for one device.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    host: String,
    policy: StatusPolicy,
}

impl DeviceClient {
    pub fn new(session: &DeviceSession) -> Result<Self> {
        let base_url = Url::parse(&session.base_url())
            .map_err(|e| ClientError::Config(format!("invalid device address: {e}")))?;

        Ok(Self {
            http: build_http(session, session.timeout)?,
            base_url,
            host: session.authority(),
            policy: session.status_policy,
        })
    }

    /// Same client, different status policy for the calls made through it.
    pub fn with_policy(&self, policy: StatusPolicy) -> Self {
        Self {
            policy,
            ..self.clone()
        }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Endpoint URL from path segments; each segment is percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http.get(self.url(segments)?))
    }

    pub(crate) fn post(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http.post(self.url(segments)?))
    }

    pub(crate) fn put(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http.put(self.url(segments)?))
    }

    pub(crate) fn delete(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.http.delete(self.url(segments)?))
    }

    /// Send a request and apply the status policy.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Reply<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| classify(&self.host, e))?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(Some(response));
        }

        match self.policy {
            StatusPolicy::Raise => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status, body })
            }
            StatusPolicy::Absent => {
                debug!(%status, url = %response.url(), "Unexpected status, treating as absent");
                Ok(None)
            }
        }
    }

    /// Send a request whose 200 reply carries no payload worth parsing.
    pub(crate) async fn send_ack(&self, request: RequestBuilder) -> Reply<()> {
        Ok(self.send(request).await?.map(|_| ()))
    }

    /// Send a request and decode the 200 reply as JSON.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Reply<T> {
        match self.send(request).await? {
            Some(response) => {
                let value = response
                    .json::<T>()
                    .await
                    .map_err(|e| classify(&self.host, e))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}
