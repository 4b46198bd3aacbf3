//! Wire models for the device REST API.
//!
//! Every field the device may omit is an `Option`; unknown keys are kept in
//! an `extra` map so nothing the firmware sends is silently dropped.

pub mod device;
pub mod gallery;
pub mod playlist;
pub mod show;

pub use device::{DeviceInfo, DeviceState, NetworkType, PlayType};
pub use gallery::{GalleryImage, GalleryPage, GallerySummary};
pub use playlist::{Playlist, PlaylistEntry, PlaylistItem, PlaylistKind};
pub use show::{SettingsUpdate, ShowRequest};
