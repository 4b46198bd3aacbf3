//! Bodies for `POST /show` and `POST /settings`.

use super::device::PlayType;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ShowRequest {
    pub play_type: PlayType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<String>,
    /// Seconds per image for gallery slideshows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Dithering algorithm index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dither: Option<u8>,
}

impl ShowRequest {
    pub fn image(path: impl Into<String>) -> Self {
        Self {
            play_type: PlayType::Single,
            gallery: None,
            duration: None,
            playlist: None,
            image: Some(path.into()),
            dither: None,
        }
    }

    pub fn gallery(name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            play_type: PlayType::Gallery,
            gallery: Some(name.into()),
            duration: Some(duration_secs),
            playlist: None,
            image: None,
            dither: None,
        }
    }

    pub fn playlist(name: impl Into<String>) -> Self {
        Self {
            play_type: PlayType::Playlist,
            gallery: None,
            duration: None,
            playlist: Some(name.into()),
            image: None,
            dither: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle: Option<u64>,
    /// Wake sensitivity index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx_wake_sens: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_gallery_body() {
        let json = serde_json::to_value(ShowRequest::gallery("holiday", 300)).unwrap();
        assert_eq!(json["play_type"], 1);
        assert_eq!(json["gallery"], "holiday");
        assert_eq!(json["duration"], 300);
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_settings_only_sends_set_fields() {
        let body = SettingsUpdate {
            max_idle: Some(120),
            ..Default::default()
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({ "max_idle": 120 }));
    }
}
