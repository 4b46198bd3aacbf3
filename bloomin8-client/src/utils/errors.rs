//! Error types for the Bloomin8 client.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Any transport-level failure talking to the device (timeout, refused,
    /// DNS, socket errors). Callers never see the raw transport variants.
    #[error("Device unreachable at {host}: {reason}")]
    Unreachable { host: String, reason: String },

    #[error("Unexpected status code: {status}\n\nResponse content:\n{body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Failed to decode device response: {0}")]
    Decode(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source folder does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Source path is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
