//! System endpoints: device info, state, display control, power.

use super::{DeviceClient, Reply};
use crate::models::{DeviceInfo, DeviceState, SettingsUpdate, ShowRequest};

impl DeviceClient {
    /// GET /deviceInfo
    pub async fn device_info(&self) -> Reply<DeviceInfo> {
        self.send_json(self.get(&["deviceInfo"])?).await
    }

    /// GET /state
    pub async fn state(&self) -> Reply<DeviceState> {
        self.send_json(self.get(&["state"])?).await
    }

    /// POST /clearScreen
    pub async fn clear_screen(&self) -> Reply<()> {
        self.send_ack(self.post(&["clearScreen"])?).await
    }

    /// POST /reboot
    pub async fn reboot(&self) -> Reply<()> {
        self.send_ack(self.post(&["reboot"])?).await
    }

    /// POST /settings
    pub async fn update_settings(&self, settings: &SettingsUpdate) -> Reply<()> {
        self.send_ack(self.post(&["settings"])?.json(settings)).await
    }

    /// POST /show
    pub async fn show(&self, request: &ShowRequest) -> Reply<()> {
        self.send_ack(self.post(&["show"])?.json(request)).await
    }

    /// POST /showNext
    pub async fn show_next(&self) -> Reply<()> {
        self.send_ack(self.post(&["showNext"])?).await
    }

    /// POST /sleep
    pub async fn sleep(&self) -> Reply<()> {
        self.send_ack(self.post(&["sleep"])?).await
    }
}
