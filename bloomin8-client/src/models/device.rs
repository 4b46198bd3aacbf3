//! `GET /deviceInfo` and `GET /state` payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Network link the frame is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Unknown,
    Ethernet,
    Wifi,
}

impl NetworkType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => NetworkType::Ethernet,
            2 => NetworkType::Wifi,
            _ => NetworkType::Unknown,
        }
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkType::Unknown => write!(f, "Unknown"),
            NetworkType::Ethernet => write!(f, "Ethernet"),
            NetworkType::Wifi => write!(f, "WiFi"),
        }
    }
}

/// What the frame is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayType {
    Single,
    Gallery,
    Playlist,
}

impl TryFrom<u8> for PlayType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PlayType::Single),
            1 => Ok(PlayType::Gallery),
            2 => Ok(PlayType::Playlist),
            other => Err(format!("unknown play type {other}")),
        }
    }
}

impl From<PlayType> for u8 {
    fn from(play_type: PlayType) -> u8 {
        match play_type {
            PlayType::Single => 0,
            PlayType::Gallery => 1,
            PlayType::Playlist => 2,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: Option<String>,
    /// Firmware version
    pub version: Option<String>,
    pub board_model: Option<String>,
    pub screen_model: Option<String>,
    /// Battery level, 0-100
    pub battery: Option<u8>,
    pub fs_ready: Option<bool>,
    /// Storage size in bytes
    pub total_size: Option<u64>,
    pub free_size: Option<u64>,
    /// Seconds
    pub sleep_duration: Option<u64>,
    pub max_idle: Option<u64>,
    pub network_type: Option<i64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sta_ssid: Option<String>,
    pub sta_ip: Option<String>,
    /// Currently displayed image path
    pub image: Option<String>,
    /// Next scheduled refresh (unix seconds)
    pub next_time: Option<i64>,
    pub gallery: Option<String>,
    pub playlist: Option<String>,
    pub play_type: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceInfo {
    pub fn ip_address(&self) -> Option<&str> {
        self.sta_ip.as_deref()
    }

    pub fn ssid(&self) -> Option<&str> {
        self.sta_ssid.as_deref()
    }

    pub fn network(&self) -> Option<NetworkType> {
        self.network_type.map(NetworkType::from_code)
    }

    /// `None` when the code is missing or not one the firmware documents.
    pub fn playing(&self) -> Option<PlayType> {
        self.play_type.and_then(|code| PlayType::try_from(code).ok())
    }

    /// Share of storage in use, when both sizes are reported.
    pub fn used_percent(&self) -> Option<f64> {
        match (self.total_size, self.free_size) {
            (Some(total), Some(free)) if total > 0 => {
                Some(total.saturating_sub(free) as f64 / total as f64 * 100.0)
            }
            _ => None,
        }
    }

    pub fn next_refresh(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.next_time
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }
}

/// Brief status of the device's task processor. The firmware does not
/// document its keys, so they are kept as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
