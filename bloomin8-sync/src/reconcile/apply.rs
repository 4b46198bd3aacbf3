//! Apply a [`SyncPlan`] to the device.
//!
//! Deletions run strictly before uploads, each group in plan order. Every
//! item is attempted exactly once; a failure is logged and counted and the
//! run moves on.

use super::plan::SyncPlan;
use async_trait::async_trait;
use bloomin8_client::fs::LocalImage;
use bloomin8_client::transfer::progress::{
    bytes_per_second, format_elapsed, format_megabytes, format_speed, TransferTracker,
};
use bloomin8_client::{ClientError, DeviceClient, StatusPolicy};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Device operations the engine needs.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    async fn delete_image(&self, filename: &str, gallery: &str) -> Result<(), ClientError>;

    /// Upload one local file; returns the bytes sent.
    async fn upload_image(&self, image: &LocalImage, gallery: &str) -> Result<u64, ClientError>;
}

/// Non-200 replies always count as failures here, whatever the session's
/// policy says.
#[async_trait]
impl SyncGateway for DeviceClient {
    async fn delete_image(&self, filename: &str, gallery: &str) -> Result<(), ClientError> {
        let client = self.with_policy(StatusPolicy::Raise);
        client.delete_image(filename, gallery).await.map(|_| ())
    }

    async fn upload_image(&self, image: &LocalImage, gallery: &str) -> Result<u64, ClientError> {
        let client = self.with_policy(StatusPolicy::Raise);
        let sent = client.upload_file(&image.path, gallery, false).await?;
        Ok(sent.unwrap_or(image.size_bytes))
    }
}

/// Outcome counts for one `execute` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncResult {
    pub planned_uploads: usize,
    pub uploaded: usize,
    pub upload_failures: usize,
    pub planned_deletes: usize,
    pub deleted: usize,
    pub delete_failures: usize,
    /// Bytes of successfully uploaded files
    pub bytes_transferred: u64,
    pub elapsed: Duration,
}

impl SyncResult {
    pub fn has_failures(&self) -> bool {
        self.upload_failures > 0 || self.delete_failures > 0
    }

    pub fn average_speed(&self) -> f64 {
        bytes_per_second(self.bytes_transferred, self.elapsed)
    }
}

pub async fn execute<G: SyncGateway + ?Sized>(plan: &SyncPlan, gateway: &G, gallery: &str) -> SyncResult {
    let mut result = SyncResult {
        planned_uploads: plan.to_upload.len(),
        planned_deletes: plan.to_delete.len(),
        ..SyncResult::default()
    };
    let mut tracker = TransferTracker::new();

    if !plan.to_delete.is_empty() {
        info!("Deleting {} removed file(s) from device...", plan.to_delete.len());
    }
    let total = plan.to_delete.len();
    for (idx, filename) in plan.to_delete.iter().enumerate() {
        info!("[{}/{}] Deleting {}...", idx + 1, total, filename);
        let started = Instant::now();
        match gateway.delete_image(filename, gallery).await {
            Ok(()) => {
                info!("    ✓ Deleted in {}", format_elapsed(started.elapsed()));
                result.deleted += 1;
            }
            Err(e) => {
                error!("    ✗ Failed to delete {}: {}", filename, e);
                result.delete_failures += 1;
            }
        }
    }

    if !plan.to_upload.is_empty() {
        info!("Uploading {} new file(s)...", plan.to_upload.len());
    }
    let total = plan.to_upload.len();
    for (idx, image) in plan.to_upload.iter().enumerate() {
        info!(
            "[{}/{}] Uploading {} ({})...",
            idx + 1,
            total,
            image.filename,
            format_megabytes(image.size_bytes)
        );
        let started = Instant::now();
        match gateway.upload_image(image, gallery).await {
            Ok(sent) => {
                let took = started.elapsed();
                info!(
                    "    ✓ Uploaded in {} ({})",
                    format_elapsed(took),
                    format_speed(bytes_per_second(sent, took))
                );
                tracker.record(sent);
                result.uploaded += 1;
            }
            Err(e) => {
                error!("    ✗ Failed to upload {}: {}", image.filename, e);
                result.upload_failures += 1;
            }
        }
    }

    result.bytes_transferred = tracker.bytes();
    result.elapsed = tracker.elapsed();
    result
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records calls in order; names listed in `failing` are rejected.
    #[derive(Default)]
    pub struct FakeGateway {
        pub failing: Vec<String>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        pub fn failing(names: &[&str]) -> Self {
            Self {
                failing: names.iter().map(|name| name.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn outcome(&self, name: &str) -> Result<(), ClientError> {
            if self.failing.iter().any(|f| f == name) {
                return Err(ClientError::Unreachable {
                    host: "10.0.0.70:80".to_string(),
                    reason: "Request timed out".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SyncGateway for FakeGateway {
        async fn delete_image(&self, filename: &str, gallery: &str) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(format!("delete {gallery}/{filename}"));
            self.outcome(filename)
        }

        async fn upload_image(&self, image: &LocalImage, gallery: &str) -> Result<u64, ClientError> {
            self.calls.lock().unwrap().push(format!("upload {gallery}/{}", image.filename));
            self.outcome(&image.filename).map(|()| image.size_bytes)
        }
    }
}
