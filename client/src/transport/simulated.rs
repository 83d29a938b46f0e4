use async_trait::async_trait;
use lamp_common::{
    ModeEcho, Settings, SettingsPatch, StatusPatch, TransportError, TransportKind, DEFAULT_MODE,
};
use tokio::{sync::Mutex, time::Instant};

use super::Transport;

const SIMULATED_SSID: &str = "MeowMeow";

#[derive(Debug)]
struct Store {
    led_on: bool,
    ssid: String,
    mode: String,
    settings: Settings,
}

/// In-process stand-in for a lamp. Every call succeeds and mutates the
/// store before it resolves.
pub struct SimulatedTransport {
    started: Instant,
    store: Mutex<Store>,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            store: Mutex::new(Store {
                led_on: false,
                ssid: SIMULATED_SSID.to_string(),
                mode: DEFAULT_MODE.to_string(),
                settings: Settings::default(),
            }),
        }
    }

    fn snapshot(&self, store: &Store) -> StatusPatch {
        StatusPatch {
            led_on: Some(store.led_on),
            uptime_s: Some(self.started.elapsed().as_secs()),
            ssid: Some(store.ssid.clone()),
            mode: Some(store.mode.clone()),
        }
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Simulated
    }

    async fn status(&self) -> Result<StatusPatch, TransportError> {
        let store = self.store.lock().await;
        Ok(self.snapshot(&store))
    }

    async fn set_led(&self, on: bool) -> Result<StatusPatch, TransportError> {
        let mut store = self.store.lock().await;
        store.led_on = on;
        Ok(self.snapshot(&store))
    }

    async fn settings(&self) -> Result<SettingsPatch, TransportError> {
        let store = self.store.lock().await;
        Ok(store.settings.clone().into())
    }

    async fn save_settings(&self, payload: &Settings) -> Result<SettingsPatch, TransportError> {
        let mut store = self.store.lock().await;
        store.settings = payload.clone();
        Ok(store.settings.clone().into())
    }

    async fn set_mode(&self, mode: &str) -> Result<ModeEcho, TransportError> {
        let mut store = self.store.lock().await;
        store.mode = mode.to_string();
        Ok(ModeEcho {
            mode: Some(store.mode.clone()),
        })
    }
}
