//! Playlist payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of `GET /playlist/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub name: Option<String>,
    pub time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    /// Each item shows for `duration` seconds
    Duration,
    /// Each item shows at wall-clock `time`
    Time,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Image path on the device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// "HH:MM"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Body of `GET /playlist/{name}` and `PUT /playlist/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaylistKind,
    #[serde(rename = "list")]
    pub items: Vec<PlaylistItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<i64>,
}
