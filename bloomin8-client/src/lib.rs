//! Bloomin8 client library
//!
//! Typed access to the Bloomin8 e-ink frame: the REST API, a liveness
//! probe and a Bluetooth LE wake-up path for when the frame's Wi-Fi is
//! asleep.

pub mod ble;
pub mod config;
pub mod device;
pub mod fs;
pub mod gateway;
pub mod liveness;
pub mod models;
pub mod transfer;
pub mod utils;

// Re-export commonly used types
pub use config::{BleConfig, DeviceConfig, DeviceSession, StatusPolicy};
pub use device::Device;
pub use gateway::{DeviceClient, Reply};
pub use utils::errors::ClientError;
pub type Result<T> = std::result::Result<T, ClientError>;
