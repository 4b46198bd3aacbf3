//! Connection settings for a Bloomin8 device.
//!
//! `DeviceConfig` and `BleConfig` are the serializable forms loaded from a
//! TOML file; `DeviceSession` is the runtime handle built from them and
//! passed to every gateway call.

use crate::utils::errors::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// What a gateway call does when the device answers with a status other
/// than the documented 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Return `ClientError::UnexpectedStatus`.
    #[default]
    Raise,
    /// Return `Ok(None)`.
    Absent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// IP address or hostname of the device
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Use HTTPS instead of HTTP
    #[serde(default)]
    pub https: bool,

    /// Verify TLS certificates (the frame ships a self-signed one)
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// Operational request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Liveness probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    #[serde(default)]
    pub status_policy: StatusPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BleConfig {
    /// Full or partial advertised name to look for
    #[serde(default = "default_ble_name")]
    pub name: String,

    /// Known address; skips scanning when set
    #[serde(default)]
    pub address: Option<String>,

    /// How long to scan, in seconds
    #[serde(default = "default_scan_timeout_secs")]
    pub scan_timeout_secs: u64,
}

fn default_host() -> String {
    "10.0.0.70".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_verify_tls() -> bool {
    true
}

fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT.as_secs_f64()
}

fn default_probe_timeout_ms() -> u64 {
    200
}

fn default_ble_name() -> String {
    "BLOOMIN8".to_string()
}

fn default_scan_timeout_secs() -> u64 {
    10
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            https: false,
            verify_tls: default_verify_tls(),
            timeout_secs: default_timeout_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            status_policy: StatusPolicy::default(),
        }
    }
}

impl Default for BleConfig {
    fn default() -> Self {
        Self {
            name: default_ble_name(),
            address: None,
            scan_timeout_secs: default_scan_timeout_secs(),
        }
    }
}

/// Connection parameters plus the optional BLE identity of one device.
///
/// Owns no remote state. `ble_address` may be filled in once by a
/// successful wake-up scan and is then reused for the rest of the process.
#[derive(Debug, Clone)]
pub struct DeviceSession {
    pub host: String,
    pub port: u16,
    pub use_https: bool,
    pub verify_tls: bool,
    pub timeout: Duration,
    pub probe_timeout: Duration,
    pub status_policy: StatusPolicy,
    pub ble_name: String,
    pub ble_address: Option<String>,
    pub scan_timeout: Duration,
}

impl DeviceSession {
    /// Session with default settings for `host`.
    pub fn new(host: impl Into<String>) -> Self {
        let device = DeviceConfig::default();
        let ble = BleConfig::default();
        Self {
            host: host.into(),
            port: device.port,
            use_https: device.https,
            verify_tls: device.verify_tls,
            timeout: DEFAULT_TIMEOUT,
            probe_timeout: Duration::from_millis(device.probe_timeout_ms),
            status_policy: device.status_policy,
            ble_name: ble.name,
            ble_address: ble.address,
            scan_timeout: Duration::from_secs(ble.scan_timeout_secs),
        }
    }

    pub fn from_config(device: &DeviceConfig, ble: &BleConfig) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(device.timeout_secs).map_err(|e| {
            ClientError::Config(format!("invalid timeout_secs {}: {}", device.timeout_secs, e))
        })?;

        Ok(Self {
            host: device.host.clone(),
            port: device.port,
            use_https: device.https,
            verify_tls: device.verify_tls,
            timeout,
            probe_timeout: Duration::from_millis(device.probe_timeout_ms),
            status_policy: device.status_policy,
            ble_name: ble.name.clone(),
            ble_address: ble.address.clone(),
            scan_timeout: Duration::from_secs(ble.scan_timeout_secs),
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Base URL of the REST API, without a trailing slash.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// `host:port` as used in log lines and unreachable errors.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let device: DeviceConfig = toml::from_str("").unwrap();
        let ble: BleConfig = toml::from_str("").unwrap();
        let session = DeviceSession::from_config(&device, &ble).unwrap();

        assert_eq!(session.base_url(), "http://10.0.0.70:80");
        assert_eq!(session.timeout, Duration::from_secs(10));
        assert_eq!(session.probe_timeout, Duration::from_millis(200));
        assert_eq!(session.scan_timeout, Duration::from_secs(10));
        assert_eq!(session.status_policy, StatusPolicy::Raise);
        assert_eq!(session.ble_name, "BLOOMIN8");
        assert!(session.ble_address.is_none());
    }

    #[test]
    fn test_https_base_url() {
        let device: DeviceConfig = toml::from_str(
            r#"
            host = "frame.local"
            port = 8443
            https = true
            status_policy = "absent"
            "#,
        )
        .unwrap();
        let session = DeviceSession::from_config(&device, &BleConfig::default()).unwrap();

        assert_eq!(session.base_url(), "https://frame.local:8443");
        assert_eq!(session.authority(), "frame.local:8443");
        assert_eq!(session.status_policy, StatusPolicy::Absent);
    }

    #[test]
    fn test_builder_helpers() {
        let session = DeviceSession::new("127.0.0.1")
            .with_port(9000)
            .with_status_policy(StatusPolicy::Absent);
        assert_eq!(session.base_url(), "http://127.0.0.1:9000");
        assert_eq!(session.status_policy, StatusPolicy::Absent);
    }

    #[test]
    fn test_unrepresentable_timeout_is_a_config_error() {
        for bad in ["timeout_secs = inf", "timeout_secs = 1e30", "timeout_secs = -1.0", "timeout_secs = nan"] {
            let device: DeviceConfig = toml::from_str(bad).unwrap();
            let result = DeviceSession::from_config(&device, &BleConfig::default());
            assert!(matches!(result, Err(ClientError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn test_fractional_timeout() {
        let device: DeviceConfig = toml::from_str("timeout_secs = 2.5").unwrap();
        let session = DeviceSession::from_config(&device, &BleConfig::default()).unwrap();
        assert_eq!(session.timeout, Duration::from_millis(2500));
    }
}
