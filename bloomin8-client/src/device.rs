//! A frame on the network: its session plus a ready REST client.

use crate::ble::{self, WakeOutcome};
use crate::config::{DeviceSession, StatusPolicy};
use crate::gateway::DeviceClient;
use crate::liveness;
use crate::utils::errors::Result;
use std::time::Duration;
use tracing::info;

pub struct Device {
    session: DeviceSession,
    client: DeviceClient,
}

impl Device {
    pub fn new(session: DeviceSession) -> Result<Self> {
        let client = DeviceClient::new(&session)?;
        Ok(Self { session, client })
    }

    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }

    /// Client that ignores the session's policy for one call site.
    pub fn client_with(&self, policy: StatusPolicy) -> DeviceClient {
        self.client.with_policy(policy)
    }

    /// Liveness probe; see [`liveness::probe`].
    pub async fn is_awake(&self, timeout: Duration) -> bool {
        liveness::probe(&self.session, timeout).await
    }

    /// Wake the frame over Bluetooth.
    ///
    /// An address discovered by scanning is kept for later calls, but only
    /// when none was configured.
    pub async fn wake(&mut self, scan_timeout: Duration) -> WakeOutcome {
        let outcome = ble::wake(
            &self.session.ble_name,
            self.session.ble_address.as_deref(),
            scan_timeout,
        )
        .await;
        self.remember(&outcome);
        outcome
    }

    fn remember(&mut self, outcome: &WakeOutcome) {
        if self.session.ble_address.is_some() {
            return;
        }
        if let Some(address) = &outcome.discovered_address {
            info!("Remembering Bluetooth address {}", address);
            self.session.ble_address = Some(address.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(address: Option<&str>) -> WakeOutcome {
        WakeOutcome {
            success: address.is_some(),
            discovered_address: address.map(str::to_string),
            failed_in: None,
            reason: None,
        }
    }

    #[test]
    fn test_discovered_address_is_cached_once() {
        let mut device = Device::new(DeviceSession::new("10.0.0.70")).unwrap();

        device.remember(&outcome(Some("AA:BB")));
        assert_eq!(device.session().ble_address.as_deref(), Some("AA:BB"));

        device.remember(&outcome(Some("CC:DD")));
        assert_eq!(device.session().ble_address.as_deref(), Some("AA:BB"));
    }

    #[test]
    fn test_failed_wake_leaves_address_unset() {
        let mut device = Device::new(DeviceSession::new("10.0.0.70")).unwrap();
        device.remember(&outcome(None));
        assert!(device.session().ble_address.is_none());
    }

    #[tokio::test]
    async fn test_is_awake_against_fake_frame() {
        use crate::gateway::testing::{spawn, session_for, FakeFrame};
        let addr = spawn(std::sync::Arc::new(FakeFrame::default())).await;
        let device = Device::new(session_for(addr)).unwrap();
        assert!(device.is_awake(Duration::from_millis(300)).await);
    }
}
