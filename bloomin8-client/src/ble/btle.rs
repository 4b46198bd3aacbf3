//! [`WakeLink`] backed by the host adapter through btleplug.

use super::{Advertisement, BleError, WakeLink};
use async_trait::async_trait;
use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct BtleLink {
    adapter: Adapter,
    connected: Option<Peripheral>,
}

impl BtleLink {
    /// Use the first adapter the platform reports.
    pub async fn open() -> Result<Self, BleError> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(BleError::NoAdapter)?;
        Ok(Self {
            adapter,
            connected: None,
        })
    }

    async fn advertisements(&self) -> Result<Vec<(Advertisement, Peripheral)>, BleError> {
        let mut found = Vec::new();
        for peripheral in self.adapter.peripherals().await? {
            let props = peripheral.properties().await?;
            let name = props.as_ref().and_then(|p| p.local_name.clone());
            let address = peripheral_address(&peripheral, props.map(|p| p.address.to_string()));
            found.push((Advertisement { name, address }, peripheral));
        }
        Ok(found)
    }

    /// Scan until a peripheral with `address` shows up or `deadline` passes.
    async fn find(&self, address: &str, deadline: Instant) -> Result<Peripheral, BleError> {
        self.adapter.start_scan(ScanFilter::default()).await?;
        let result = loop {
            let hit = self
                .advertisements()
                .await?
                .into_iter()
                .find(|(ad, _)| ad.address.eq_ignore_ascii_case(address));
            if let Some((_, peripheral)) = hit {
                break Ok(peripheral);
            }
            if Instant::now() >= deadline {
                break Err(BleError::PeripheralNotFound(address.to_string()));
            }
            sleep(POLL_INTERVAL).await;
        };
        if let Err(e) = self.adapter.stop_scan().await {
            debug!("stop_scan failed: {}", e);
        }
        result
    }
}

/// Platform address, or the peripheral id where the address is hidden.
fn peripheral_address(peripheral: &Peripheral, advertised: Option<String>) -> String {
    match advertised {
        Some(address) if address != "00:00:00:00:00:00" => address,
        _ => peripheral.id().to_string(),
    }
}

#[async_trait]
impl WakeLink for BtleLink {
    async fn scan(&mut self, window: Duration) -> Result<Vec<Advertisement>, BleError> {
        self.adapter.start_scan(ScanFilter::default()).await?;
        sleep(window).await;
        let ads = self.advertisements().await;
        if let Err(e) = self.adapter.stop_scan().await {
            debug!("stop_scan failed: {}", e);
        }
        Ok(ads?.into_iter().map(|(ad, _)| ad).collect())
    }

    async fn connect(&mut self, address: &str, limit: Duration) -> Result<(), BleError> {
        let deadline = Instant::now() + limit;
        let peripheral = self.find(address, deadline).await?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        timeout(remaining, peripheral.connect())
            .await
            .map_err(|_| BleError::ConnectTimeout(address.to_string()))??;
        let discovered = peripheral.discover_services().await;
        self.connected = Some(peripheral);
        if let Err(e) = discovered {
            self.disconnect().await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn write(&mut self, characteristic: Uuid, payload: &[u8]) -> Result<(), BleError> {
        let peripheral = self.connected.as_ref().ok_or(BleError::NotConnected)?;
        let target = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == characteristic)
            .ok_or(BleError::CharacteristicMissing(characteristic))?;
        peripheral.write(&target, payload, WriteType::WithResponse).await?;
        Ok(())
    }

    async fn disconnect(&mut self) {
        if let Some(peripheral) = self.connected.take() {
            if let Err(e) = peripheral.disconnect().await {
                warn!("Bluetooth disconnect failed: {}", e);
            }
        }
    }
}
