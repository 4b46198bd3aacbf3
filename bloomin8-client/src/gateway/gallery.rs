//! Gallery endpoints.

use super::{DeviceClient, Reply};
use crate::models::{GalleryImage, GalleryPage, GallerySummary};
use crate::utils::errors::Result;
use tracing::{debug, warn};

/// Images requested per page when walking a whole gallery.
pub const PAGE_SIZE: u64 = 100;

impl DeviceClient {
    /// GET /gallery/list
    pub async fn list_galleries(&self) -> Reply<Vec<GallerySummary>> {
        self.send_json(self.get(&["gallery", "list"])?).await
    }

    /// GET /gallery/{name}?offset&limit
    pub async fn gallery_page(&self, name: &str, offset: u64, limit: u64) -> Reply<GalleryPage> {
        let request = self
            .get(&["gallery", name])?
            .query(&[("offset", offset), ("limit", limit)]);
        self.send_json(request).await
    }

    /// Every image in a gallery, following pagination until the reported
    /// total is reached. Without a total, a short page ends the listing.
    pub async fn gallery_images(&self, name: &str) -> Result<Vec<GalleryImage>> {
        let mut images: Vec<GalleryImage> = Vec::new();
        let mut offset = 0u64;
        let mut previous_first: Option<String> = None;

        loop {
            let Some(page) = self.gallery_page(name, offset, PAGE_SIZE).await? else {
                break;
            };

            let count = page.data.len() as u64;
            let first = page.data.first().and_then(|image| image.name.clone());
            if offset > 0 && first.is_some() && first == previous_first {
                warn!(gallery = name, offset, "Device ignored the page offset, stopping pagination");
                break;
            }
            previous_first = first;

            images.extend(page.data);
            offset += count;
            debug!(gallery = name, fetched = images.len(), total = ?page.total, "Fetched gallery page");

            if count == 0 {
                break;
            }
            match page.total {
                Some(total) if offset >= total => break,
                Some(_) => {}
                None if count < PAGE_SIZE => break,
                None => {}
            }
        }

        Ok(images)
    }

    /// Number of images in a gallery, using the page total when the device
    /// reports one.
    pub async fn gallery_size(&self, name: &str) -> Result<u64> {
        match self.gallery_page(name, 0, 1).await? {
            Some(GalleryPage { total: Some(total), .. }) => Ok(total),
            Some(_) => Ok(self.gallery_images(name).await?.len() as u64),
            None => Ok(0),
        }
    }

    /// PUT /gallery/{name}
    ///
    /// The firmware does not document the body; it is passed through as-is.
    pub async fn put_gallery(&self, name: &str, body: &serde_json::Value) -> Reply<()> {
        self.send_ack(self.put(&["gallery", name])?.json(body)).await
    }

    /// DELETE /gallery/{name}
    pub async fn delete_gallery(&self, name: &str) -> Reply<()> {
        self.send_ack(self.delete(&["gallery", name])?).await
    }
}
