//! bloomin8-sync - Main entry point
//!
//! Synchronize a local folder of JPEG images into a gallery on a Bloomin8
//! frame.

use anyhow::Result;
use bloomin8_client::{utils, Device};
use bloomin8_sync::config::SyncConfig;
use bloomin8_sync::orchestrator::{self, StdinConfirm, SyncOptions};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// IP address or hostname of the Bloomin8 device
    #[arg(long)]
    host: Option<String>,

    /// Port number
    #[arg(long)]
    port: Option<u16>,

    /// Use HTTPS instead of HTTP
    #[arg(long)]
    https: bool,

    /// Source folder containing images to sync
    #[arg(long, value_name = "DIR")]
    source: PathBuf,

    /// Gallery name to synchronize to on the device
    #[arg(long)]
    gallery: Option<String>,

    /// Skip Bluetooth wake-up attempt
    #[arg(long)]
    no_wakeup: bool,

    /// Full or partial Bluetooth device name to search for during wake-up
    #[arg(long)]
    device_name: Option<String>,

    /// Bluetooth MAC address (skips scanning if provided)
    #[arg(long)]
    ble_address: Option<String>,

    /// Skip confirmation prompt and proceed with synchronization
    #[arg(long)]
    force: bool,

    /// Mirror mode: delete images from device that are not in source folder
    #[arg(long)]
    mirror: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    /// Command-line flags win over the configuration file.
    fn apply(&self, config: &mut SyncConfig) {
        if let Some(host) = &self.host {
            config.device.host = host.clone();
        }
        if let Some(port) = self.port {
            config.device.port = port;
        }
        if self.https {
            config.device.https = true;
        }
        if let Some(gallery) = &self.gallery {
            config.sync.gallery = gallery.clone();
        }
        if self.no_wakeup {
            config.sync.wake = false;
        }
        if let Some(name) = &self.device_name {
            config.ble.name = name.clone();
        }
        if let Some(address) = &self.ble_address {
            config.ble.address = Some(address.clone());
        }
        if self.force {
            config.sync.force = true;
        }
        if self.mirror {
            config.sync.mirror = true;
        }
        if self.verbose {
            config.log.level = utils::logger::verbose_level();
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => SyncConfig::from_file(path)?,
        None => SyncConfig::default(),
    };
    args.apply(&mut config);

    // Initialize logging
    utils::logger::init(&config.log.level)?;

    tracing::debug!("bloomin8-sync v{}", env!("CARGO_PKG_VERSION"));

    let session = config.session()?;
    let options = SyncOptions {
        source: args.source.clone(),
        gallery: config.sync.gallery.clone(),
        wake: config.sync.wake,
        force: config.sync.force,
        mirror: config.sync.mirror,
        probe_timeout: session.probe_timeout,
        scan_timeout: session.scan_timeout,
    };

    let mut device = Device::new(session)?;
    tracing::debug!("Device at {}", device.session().base_url());

    let report = orchestrator::run(&mut device, &mut StdinConfirm, &options).await;
    Ok(ExitCode::from(report.exit_code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_is_required() {
        assert!(Args::try_parse_from(["bloomin8-sync"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "bloomin8-sync",
            "--source",
            "/photos",
            "--host",
            "192.168.1.40",
            "--gallery",
            "holiday",
            "--no-wakeup",
            "--ble-address",
            "C0:FF:EE:00:00:01",
            "--mirror",
            "-v",
        ])
        .unwrap();

        let mut config = SyncConfig::default();
        args.apply(&mut config);

        assert_eq!(config.device.host, "192.168.1.40");
        assert_eq!(config.device.port, 80);
        assert_eq!(config.sync.gallery, "holiday");
        assert!(!config.sync.wake);
        assert!(config.sync.mirror);
        assert!(!config.sync.force);
        assert_eq!(config.ble.address.as_deref(), Some("C0:FF:EE:00:00:01"));
        assert_eq!(config.log.level, "info,bloomin8_client=debug,bloomin8_sync=debug");
    }
}
