//! Liveness probe: is the device's Wi-Fi side awake right now?
//!
//! A single `GET /state` with its own short timeout, independent of the
//! session's operational timeout, so a sleeping frame is detected in a few
//! hundred milliseconds instead of after the full request timeout.

use crate::config::DeviceSession;
use crate::gateway::build_http;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// `true` only when the device answers 200 within `timeout`.
///
/// Every failure (refused, connect or read timeout, DNS, socket error,
/// non-200 status) is reported as `false`; this function never errors.
pub async fn probe(session: &DeviceSession, timeout: Duration) -> bool {
    let http = match build_http(session, timeout) {
        Ok(http) => http,
        Err(e) => {
            debug!("Liveness probe could not build a client: {}", e);
            return false;
        }
    };

    let url = format!("{}/state", session.base_url());
    match http.get(&url).send().await {
        Ok(response) if response.status() == StatusCode::OK => {
            debug!(host = %session.authority(), "Liveness probe: awake");
            true
        }
        Ok(response) => {
            debug!(host = %session.authority(), status = %response.status(), "Liveness probe: unexpected status");
            false
        }
        Err(e) => {
            debug!(host = %session.authority(), "Liveness probe: not reachable ({})", e);
            false
        }
    }
}
