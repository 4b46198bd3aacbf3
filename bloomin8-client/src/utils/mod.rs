//! Utility modules for the Bloomin8 client.

pub mod errors;
pub mod logger;

pub use errors::{ClientError, Result};
