//! Bluetooth LE wake-up for a frame whose Wi-Fi radio is asleep.
//!
//! The procedure runs `Idle -> Scanning -> Connecting -> Signaling ->
//! Resetting -> Done`; any failure ends in `Failed`. Scanning is skipped
//! when the address is already known. Nothing here returns an error: every
//! failure is logged and reported through [`WakeOutcome`], because the
//! caller tries the HTTP path regardless.

pub mod btle;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub use btle::BtleLink;

/// GATT characteristic the firmware watches for the wake trigger.
pub const WAKE_CHARACTERISTIC: Uuid = Uuid::from_u128(0x0000f001_0000_1000_8000_00805f9b34fb);
/// Arms the wake trigger.
pub const WAKE_PAYLOAD: [u8; 1] = [0x01];
/// Clears the trigger; leaving it set keeps re-arming the wake logic.
pub const RESET_PAYLOAD: [u8; 1] = [0x00];
pub const RESET_DELAY: Duration = Duration::from_millis(100);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum BleError {
    #[error("No Bluetooth adapter available")]
    NoAdapter,

    #[error("Peripheral {0} not found")]
    PeripheralNotFound(String),

    #[error("Connection to {0} timed out")]
    ConnectTimeout(String),

    #[error("Characteristic {0} not found on device")]
    CharacteristicMissing(Uuid),

    #[error("Not connected")]
    NotConnected,

    #[error("Bluetooth error: {0}")]
    Btle(#[from] btleplug::Error),
}

/// One advertisement seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    pub name: Option<String>,
    pub address: String,
}

/// BLE operations the wake procedure needs.
#[async_trait]
pub trait WakeLink: Send {
    /// Collect advertisements seen during `timeout`.
    async fn scan(&mut self, timeout: Duration) -> Result<Vec<Advertisement>, BleError>;

    async fn connect(&mut self, address: &str, timeout: Duration) -> Result<(), BleError>;

    async fn write(&mut self, characteristic: Uuid, payload: &[u8]) -> Result<(), BleError>;

    async fn disconnect(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakePhase {
    Idle,
    Scanning,
    Connecting,
    Signaling,
    Resetting,
    Done,
    Failed,
}

/// Result of a wake attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeOutcome {
    pub success: bool,
    /// Address resolved by scanning, set only on success so the caller can
    /// cache it.
    pub discovered_address: Option<String>,
    /// Phase that failed, when `success` is false.
    pub failed_in: Option<WakePhase>,
    pub reason: Option<String>,
}

impl WakeOutcome {
    fn done(discovered_address: Option<String>) -> Self {
        Self {
            success: true,
            discovered_address,
            failed_in: None,
            reason: None,
        }
    }

    fn failed(phase: WakePhase, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            discovered_address: None,
            failed_in: Some(phase),
            reason: Some(reason.into()),
        }
    }

    /// `(success, discovered_address)`
    pub fn into_pair(self) -> (bool, Option<String>) {
        (self.success, self.discovered_address)
    }
}

/// First advertisement whose name contains `target`, ignoring case.
pub fn match_advertisement<'a>(ads: &'a [Advertisement], target: &str) -> Option<&'a Advertisement> {
    let needle = target.to_lowercase();
    ads.iter().find(|ad| {
        ad.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    })
}

/// Drive the wake procedure over `link`.
pub async fn run_wake<L: WakeLink + ?Sized>(
    link: &mut L,
    device_name: &str,
    known_address: Option<&str>,
    scan_timeout: Duration,
) -> WakeOutcome {
    let mut phase = WakePhase::Idle;
    debug!(?phase, "Starting Bluetooth wake-up");

    let (address, discovered) = match known_address {
        Some(address) => (address.to_string(), false),
        None => {
            phase = WakePhase::Scanning;
            info!("Scanning for Bluetooth device '{}'...", device_name);
            let ads = match link.scan(scan_timeout).await {
                Ok(ads) => ads,
                Err(e) => {
                    error!("Bluetooth scan error: {}", e);
                    return WakeOutcome::failed(phase, e.to_string());
                }
            };
            match match_advertisement(&ads, device_name) {
                Some(ad) => {
                    info!("Found device: {} ({})", ad.name.as_deref().unwrap_or_default(), ad.address);
                    (ad.address.clone(), true)
                }
                None => {
                    warn!("Could not find device '{}' via Bluetooth ({} advertisements seen)", device_name, ads.len());
                    return WakeOutcome::failed(phase, format!("device '{device_name}' not found"));
                }
            }
        }
    };

    phase = WakePhase::Connecting;
    debug!("Connecting to device at {}...", address);
    if let Err(e) = link.connect(&address, CONNECT_TIMEOUT).await {
        error!("Bluetooth connection error: {}", e);
        // A link can be half open (connected, services not resolved)
        link.disconnect().await;
        return WakeOutcome::failed(phase, e.to_string());
    }

    let outcome = signal(link, &mut phase).await;
    link.disconnect().await;

    match outcome {
        Ok(()) => {
            debug!("Wake signal sent successfully, device should now be awake");
            WakeOutcome::done(discovered.then_some(address))
        }
        Err(e) => {
            error!(?phase, "Bluetooth wake-up failed: {}", e);
            WakeOutcome::failed(phase, e.to_string())
        }
    }
}

async fn signal<L: WakeLink + ?Sized>(link: &mut L, phase: &mut WakePhase) -> Result<(), BleError> {
    *phase = WakePhase::Signaling;
    link.write(WAKE_CHARACTERISTIC, &WAKE_PAYLOAD).await?;
    debug!("Wake-up signal sent (0x01)");

    tokio::time::sleep(RESET_DELAY).await;

    *phase = WakePhase::Resetting;
    link.write(WAKE_CHARACTERISTIC, &RESET_PAYLOAD).await?;
    debug!("Reset signal sent (0x00)");

    *phase = WakePhase::Done;
    Ok(())
}

/// Wake a frame using the host's Bluetooth adapter.
pub async fn wake(device_name: &str, known_address: Option<&str>, scan_timeout: Duration) -> WakeOutcome {
    let mut link = match BtleLink::open().await {
        Ok(link) => link,
        Err(e) => {
            error!("Bluetooth unavailable: {}", e);
            let phase = if known_address.is_some() {
                WakePhase::Connecting
            } else {
                WakePhase::Scanning
            };
            return WakeOutcome::failed(phase, e.to_string());
        }
    };
    run_wake(&mut link, device_name, known_address, scan_timeout).await
}

/// Blocking form of [`wake`] for callers without an async runtime.
///
/// Builds a current-thread runtime for this one call and drops it before
/// returning. Must not be called from inside a tokio runtime.
pub fn wake_blocking(device_name: &str, known_address: Option<&str>, scan_timeout: Duration) -> WakeOutcome {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(wake(device_name, known_address, scan_timeout)),
        Err(e) => {
            error!("Could not start Bluetooth runtime: {}", e);
            WakeOutcome::failed(WakePhase::Idle, e.to_string())
        }
    }
}
