pub mod scanner;

pub use scanner::{scan_images, validate_source, LocalImage};
