//! Fatal errors for a sync run. Per-item upload/delete failures are not
//! errors; they are counted in `SyncResult`.

use bloomin8_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Source(ClientError),

    #[error("Failed to retrieve galleries from device: {0}")]
    Galleries(#[source] ClientError),

    #[error("Failed to retrieve images from target gallery: {0}")]
    RemoteImages(#[source] ClientError),

    #[error("Failed to scan source folder: {0}")]
    Scan(#[source] ClientError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// True when the underlying cause is a transport failure.
    pub fn is_unreachable(&self) -> bool {
        match self {
            SyncError::Galleries(e) | SyncError::RemoteImages(e) => e.is_unreachable(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
