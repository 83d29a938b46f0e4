pub mod config;
pub mod endpoints;
pub mod error;
pub mod form;
pub mod mode;
pub mod types;

pub use config::{ClientConfig, Settings, SettingsPatch};
pub use endpoints::*;
pub use error::{Operation, TransportError};
pub use form::{SettingsField, SettingsForm, SettingsGate};
pub use mode::{ModeMachine, ModePhase, ModeTicket, DEFAULT_MODE, KNOWN_MODES};
pub use types::{
    format_uptime, ConnectionState, DeviceState, DeviceStatus, DeviceView, ModeEcho, ModeRequest,
    StatusPatch, TransportKind,
};
