//! Image endpoints: single, multi and pre-dithered uploads, and deletion.

use super::{DeviceClient, Reply};
use crate::transfer::progress::format_bytes;
use crate::transfer::progress_stream::{ProgressCallback, ProgressStream};
use crate::utils::errors::{ClientError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::trace;

const JPEG_MIME: &str = "image/jpeg";

/// An in-memory image for multi-image and raw uploads.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    fn into_part(self) -> Result<Part> {
        Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(JPEG_MIME)
            .map_err(|e| ClientError::Http(e.to_string()))
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

impl DeviceClient {
    /// POST /upload?filename&gallery&show_now with the image in field `image`.
    pub async fn upload(&self, image: ImageData, gallery: &str, show_now: bool) -> Reply<()> {
        let filename = image.filename.clone();
        let form = Form::new().part("image", image.into_part()?);
        self.send_ack(self.upload_request(&filename, gallery, show_now)?.multipart(form))
            .await
    }

    /// Stream a local file to POST /upload, named after the file itself.
    ///
    /// Returns the number of bytes sent.
    pub async fn upload_file(&self, path: &Path, gallery: &str, show_now: bool) -> Reply<u64> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", path.display()),
            )))?;

        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();

        let label = filename.clone();
        let callback: ProgressCallback = Arc::new(move |sent| {
            trace!(file = %label, sent = %format_bytes(sent), total = %format_bytes(size), "Upload progress");
        });
        let stream = ProgressStream::new(ReaderStream::new(file), callback);

        let part = Part::stream_with_length(Body::wrap_stream(stream), size)
            .file_name(filename.clone())
            .mime_str(JPEG_MIME)
            .map_err(|e| ClientError::Http(e.to_string()))?;
        let form = Form::new().part("image", part);

        let reply = self
            .send_ack(self.upload_request(&filename, gallery, show_now)?.multipart(form))
            .await?;
        Ok(reply.map(|()| size))
    }

    fn upload_request(&self, filename: &str, gallery: &str, show_now: bool) -> Result<reqwest::RequestBuilder> {
        let mut request = self
            .post(&["upload"])?
            .query(&[("filename", filename), ("gallery", gallery)]);
        if show_now {
            request = request.query(&[("show_now", flag(true))]);
        }
        Ok(request)
    }

    /// POST /image/uploadMulti?gallery&override, one `images` field per image.
    pub async fn upload_multi(&self, images: Vec<ImageData>, gallery: &str, overwrite: bool) -> Reply<()> {
        let mut form = Form::new();
        for image in images {
            form = form.part("images", image.into_part()?);
        }

        let request = self
            .post(&["image", "uploadMulti"])?
            .query(&[("gallery", gallery), ("override", flag(overwrite))])
            .multipart(form);
        self.send_ack(request).await
    }

    /// POST /image/dataUpload?filename with a pre-dithered raw frame buffer
    /// in field `dithered_image`.
    pub async fn upload_dithered(&self, image: ImageData) -> Reply<()> {
        let ImageData { filename, bytes } = image;
        let request = self
            .post(&["image", "dataUpload"])?
            .query(&[("filename", filename.as_str())]);
        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/octet-stream")
            .map_err(|e| ClientError::Http(e.to_string()))?;
        let form = Form::new().part("dithered_image", part);
        self.send_ack(request.multipart(form)).await
    }

    /// POST /image/delete?image&gallery
    pub async fn delete_image(&self, image: &str, gallery: &str) -> Reply<()> {
        let request = self
            .post(&["image", "delete"])?
            .query(&[("image", image), ("gallery", gallery)]);
        self.send_ack(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{session_for, spawn, FakeFrame};
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_upload_file_streams_multipart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sunset.jpg");
        fs::write(&path, vec![0xFFu8; 4096]).unwrap();

        let frame = Arc::new(FakeFrame::default());
        let client = DeviceClient::new(&session_for(spawn(frame.clone()).await)).unwrap();

        let sent = client.upload_file(&path, "holiday", false).await.unwrap();
        assert_eq!(sent, Some(4096));

        let recorded = frame.recorded();
        assert_eq!(recorded.len(), 1);
        let upload = &recorded[0];
        assert_eq!(upload.path, "/upload");
        assert_eq!(upload.query["filename"], "sunset.jpg");
        assert_eq!(upload.query["gallery"], "holiday");
        assert!(!upload.query.contains_key("show_now"));
        assert_eq!(upload.parts, vec![("image".to_string(), Some("sunset.jpg".to_string()), 4096)]);
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let frame = Arc::new(FakeFrame::default());
        let client = DeviceClient::new(&session_for(spawn(frame.clone()).await)).unwrap();

        let err = client
            .upload_file(Path::new("/definitely/not/here.jpg"), "default", false)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
        assert!(frame.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_upload_in_memory_with_show_now() {
        let frame = Arc::new(FakeFrame::default());
        let client = DeviceClient::new(&session_for(spawn(frame.clone()).await)).unwrap();

        client
            .upload(ImageData::new("now.jpg", vec![1, 2, 3]), "default", true)
            .await
            .unwrap();

        let recorded = frame.recorded();
        assert_eq!(recorded[0].query["show_now"], "1");
        assert_eq!(recorded[0].parts[0].2, 3);
    }

    #[tokio::test]
    async fn test_upload_multi_and_dithered() {
        let frame = Arc::new(FakeFrame::default());
        let client = DeviceClient::new(&session_for(spawn(frame.clone()).await)).unwrap();

        client
            .upload_multi(
                vec![ImageData::new("a.jpg", vec![0; 10]), ImageData::new("b.jpg", vec![0; 20])],
                "batch",
                true,
            )
            .await
            .unwrap();
        client
            .upload_dithered(ImageData::new("raw.bin", vec![0; 64]))
            .await
            .unwrap();

        let recorded = frame.recorded();
        assert_eq!(recorded[0].path, "/image/uploadMulti");
        assert_eq!(recorded[0].query["override"], "1");
        assert_eq!(recorded[0].parts.len(), 2);
        assert!(recorded[0].parts.iter().all(|(field, _, _)| field == "images"));

        assert_eq!(recorded[1].path, "/image/dataUpload");
        assert_eq!(recorded[1].query["filename"], "raw.bin");
        assert_eq!(recorded[1].parts[0].0, "dithered_image");
    }

    #[tokio::test]
    async fn test_delete_image_query() {
        let frame = Arc::new(FakeFrame::default().with_gallery("default", &[("old.jpg", 5)]));
        let client = DeviceClient::new(&session_for(spawn(frame.clone()).await)).unwrap();

        client.delete_image("old.jpg", "default").await.unwrap();

        let recorded = frame.recorded();
        assert_eq!(recorded[0].path, "/image/delete");
        assert_eq!(recorded[0].query["image"], "old.jpg");
        assert_eq!(recorded[0].query["gallery"], "default");
        assert!(client.gallery_images("default").await.unwrap().is_empty());
    }
}
