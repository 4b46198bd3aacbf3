//! Byte counting and human-readable transfer statistics.
//!
//! Used for observability only: per-item elapsed time and throughput, and
//! the run summary. Nothing here feeds back into sync decisions.

use std::time::{Duration, Instant};

/// Accumulates bytes and completed items since construction.
#[derive(Debug)]
pub struct TransferTracker {
    start_time: Instant,
    bytes: u64,
    items: usize,
}

impl TransferTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            bytes: 0,
            items: 0,
        }
    }

    /// Count one finished item of `bytes` bytes
    pub fn record(&mut self, bytes: u64) {
        self.bytes += bytes;
        self.items += 1;
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn items(&self) -> usize {
        self.items
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average speed since start, in bytes per second
    pub fn average_speed(&self) -> f64 {
        bytes_per_second(self.bytes, self.elapsed())
    }
}

impl Default for TransferTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Throughput for `bytes` moved in `elapsed`; zero when no time passed.
pub fn bytes_per_second(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        bytes as f64 / secs
    } else {
        0.0
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Format bytes as megabytes, the unit the frame's UI uses for image sizes
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Speed in MB/s at or above one megabyte per second, KB/s below it
pub fn format_speed(bytes_per_second: f64) -> String {
    let mb = bytes_per_second / (1024.0 * 1024.0);
    if mb >= 1.0 {
        format!("{:.2} MB/s", mb)
    } else {
        format!("{:.2} KB/s", bytes_per_second / 1024.0)
    }
}

/// Format a duration as seconds with two decimals
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}
