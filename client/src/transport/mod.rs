mod live;
mod simulated;

use std::sync::Arc;

use async_trait::async_trait;
use lamp_common::{
    ClientConfig, ModeEcho, Settings, SettingsPatch, StatusPatch, TransportError, TransportKind,
    DEFAULT_DEVICE_URL,
};

pub use live::LiveTransport;
pub use simulated::SimulatedTransport;

/// How the client reaches the lamp. Every call either resolves with parsed
/// data or fails with an error tagged by operation.
#[async_trait]
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn status(&self) -> Result<StatusPatch, TransportError>;

    async fn set_led(&self, on: bool) -> Result<StatusPatch, TransportError>;

    async fn settings(&self) -> Result<SettingsPatch, TransportError>;

    async fn save_settings(&self, payload: &Settings) -> Result<SettingsPatch, TransportError>;

    async fn set_mode(&self, mode: &str) -> Result<ModeEcho, TransportError>;
}

/// Picks the transport once at startup.
pub fn from_config(config: &ClientConfig) -> Arc<dyn Transport> {
    match config.transport_kind() {
        TransportKind::Live => {
            let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_DEVICE_URL);
            Arc::new(LiveTransport::new(base_url))
        }
        TransportKind::Simulated => Arc::new(SimulatedTransport::new()),
    }
}
