use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    endpoints::DEFAULT_POLL_INTERVAL_MS,
    mode::{DEFAULT_MODE, KNOWN_MODES},
    types::TransportKind,
};

pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_MQTT_TOPIC: &str = "meow/lamp";
pub const DEFAULT_LED_PIN: i32 = 4;

/// Device configuration as exchanged with `/api/settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub wifi_enabled: bool,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub mqtt_enabled: bool,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_topic: String,
    pub led_pin: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wifi_enabled: false,
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            mqtt_enabled: false,
            mqtt_host: String::new(),
            mqtt_port: DEFAULT_MQTT_PORT,
            mqtt_topic: DEFAULT_MQTT_TOPIC.to_string(),
            led_pin: DEFAULT_LED_PIN,
        }
    }
}

impl Settings {
    /// Merges a partial response over the defaults and enforces dependencies.
    pub fn from_patch(patch: &SettingsPatch) -> Self {
        let mut settings = Self::default();
        settings.merge(patch);
        settings.enforce_dependencies();
        settings
    }

    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(value) = patch.wifi_enabled {
            self.wifi_enabled = value;
        }
        if let Some(value) = &patch.wifi_ssid {
            self.wifi_ssid = value.clone();
        }
        if let Some(value) = &patch.wifi_password {
            self.wifi_password = value.clone();
        }
        if let Some(value) = patch.mqtt_enabled {
            self.mqtt_enabled = value;
        }
        if let Some(value) = &patch.mqtt_host {
            self.mqtt_host = value.clone();
        }
        if let Some(value) = patch.mqtt_port {
            self.mqtt_port = value;
        }
        if let Some(value) = &patch.mqtt_topic {
            self.mqtt_topic = value.clone();
        }
        if let Some(value) = patch.led_pin {
            self.led_pin = value;
        }
    }

    /// MQTT is only usable once WiFi is on and has an SSID.
    pub fn wifi_ready(&self) -> bool {
        self.wifi_enabled && !self.wifi_ssid.trim().is_empty()
    }

    /// Clears `mqtt_enabled` when WiFi is not ready. Returns whether it changed.
    pub fn enforce_dependencies(&mut self) -> bool {
        if self.mqtt_enabled && !self.wifi_ready() {
            self.mqtt_enabled = false;
            return true;
        }
        false
    }
}

/// Any subset of the settings keys, with mistyped values dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub wifi_enabled: Option<bool>,
    pub wifi_ssid: Option<String>,
    pub wifi_password: Option<String>,
    pub mqtt_enabled: Option<bool>,
    pub mqtt_host: Option<String>,
    pub mqtt_port: Option<u16>,
    pub mqtt_topic: Option<String>,
    pub led_pin: Option<i32>,
}

impl SettingsPatch {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            wifi_enabled: value.get("wifi_enabled").and_then(Value::as_bool),
            wifi_ssid: text("wifi_ssid"),
            wifi_password: text("wifi_password"),
            mqtt_enabled: value.get("mqtt_enabled").and_then(Value::as_bool),
            mqtt_host: text("mqtt_host"),
            // Port 0 is what the device reports for "unset".
            mqtt_port: value
                .get("mqtt_port")
                .and_then(Value::as_u64)
                .and_then(|port| u16::try_from(port).ok())
                .filter(|port| *port != 0),
            mqtt_topic: text("mqtt_topic"),
            led_pin: value
                .get("led_pin")
                .and_then(Value::as_i64)
                .and_then(|pin| i32::try_from(pin).ok()),
        }
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            wifi_enabled: Some(settings.wifi_enabled),
            wifi_ssid: Some(settings.wifi_ssid),
            wifi_password: Some(settings.wifi_password),
            mqtt_enabled: Some(settings.mqtt_enabled),
            mqtt_host: Some(settings.mqtt_host),
            mqtt_port: Some(settings.mqtt_port),
            mqtt_topic: Some(settings.mqtt_topic),
            led_pin: Some(settings.led_pin),
        }
    }
}

/// Startup configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub transport: Option<TransportKind>,
    pub poll_interval_ms: u64,
    pub known_modes: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            transport: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            known_modes: KNOWN_MODES.iter().map(|mode| mode.to_string()).collect(),
        }
    }
}

impl ClientConfig {
    /// Explicit choice wins; otherwise live only when an endpoint is known.
    pub fn transport_kind(&self) -> TransportKind {
        match (self.transport, &self.base_url) {
            (Some(kind), _) => kind,
            (None, Some(_)) => TransportKind::Live,
            (None, None) => TransportKind::Simulated,
        }
    }

    pub fn sanitize(&mut self) {
        self.base_url = self
            .base_url
            .take()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        if self.poll_interval_ms < 500 {
            self.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
        }

        let mut modes: Vec<String> = Vec::with_capacity(self.known_modes.len() + 1);
        for mode in self.known_modes.drain(..) {
            let mode = mode.trim().to_string();
            if !mode.is_empty() && !modes.contains(&mode) {
                modes.push(mode);
            }
        }
        if !modes.iter().any(|mode| mode == DEFAULT_MODE) {
            modes.insert(0, DEFAULT_MODE.to_string());
        }
        self.known_modes = modes;
    }
}
