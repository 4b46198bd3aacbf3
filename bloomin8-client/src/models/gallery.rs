//! Gallery listing payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of `GET /gallery/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GallerySummary {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One image inside a gallery page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryImage {
    pub name: Option<String>,
    /// Bytes
    pub size: Option<u64>,
    /// Modification time (unix seconds)
    pub time: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /gallery/{name}?offset&limit` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryPage {
    #[serde(default)]
    pub data: Vec<GalleryImage>,
    pub total: Option<u64>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_page_without_data() {
        let page: GalleryPage = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, Some(0));
    }

    #[test]
    fn test_gallery_image_fields() {
        let page: GalleryPage = serde_json::from_str(
            r#"{"data": [{"name": "a.jpg", "size": 100, "time": 1700000000}, {"size": 5}],
                "total": 2, "offset": 0, "limit": 100}"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].name.as_deref(), Some("a.jpg"));
        assert!(page.data[1].name.is_none());
    }
}
