use serde::Serialize;

use crate::config::{Settings, DEFAULT_LED_PIN, DEFAULT_MQTT_PORT};

/// A single settings input change, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsField {
    WifiEnabled(bool),
    WifiSsid(String),
    WifiPassword(String),
    MqttEnabled(bool),
    MqttHost(String),
    MqttPort(String),
    MqttTopic(String),
    LedPin(String),
}

impl SettingsField {
    /// Builds a field change from its wire key and a textual value.
    pub fn parse(key: &str, value: &str) -> Option<Self> {
        let field = match key {
            "wifi_enabled" => Self::WifiEnabled(parse_flag(value)?),
            "wifi_ssid" => Self::WifiSsid(value.to_string()),
            "wifi_password" => Self::WifiPassword(value.to_string()),
            "mqtt_enabled" => Self::MqttEnabled(parse_flag(value)?),
            "mqtt_host" => Self::MqttHost(value.to_string()),
            "mqtt_port" => Self::MqttPort(value.to_string()),
            "mqtt_topic" => Self::MqttTopic(value.to_string()),
            "led_pin" => Self::LedPin(value.to_string()),
            _ => return None,
        };
        Some(field)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Raw settings inputs. Numbers stay text until [`SettingsForm::to_settings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsForm {
    pub wifi_enabled: bool,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub mqtt_enabled: bool,
    pub mqtt_host: String,
    pub mqtt_port: String,
    pub mqtt_topic: String,
    pub led_pin: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SettingsForm {
    fn from(settings: &Settings) -> Self {
        Self {
            wifi_enabled: settings.wifi_enabled,
            wifi_ssid: settings.wifi_ssid.clone(),
            wifi_password: settings.wifi_password.clone(),
            mqtt_enabled: settings.mqtt_enabled,
            mqtt_host: settings.mqtt_host.clone(),
            mqtt_port: settings.mqtt_port.to_string(),
            mqtt_topic: settings.mqtt_topic.clone(),
            led_pin: settings.led_pin.to_string(),
        }
    }
}

impl SettingsForm {
    pub fn apply(&mut self, field: SettingsField) {
        match field {
            SettingsField::WifiEnabled(value) => self.wifi_enabled = value,
            SettingsField::WifiSsid(value) => self.wifi_ssid = value,
            SettingsField::WifiPassword(value) => self.wifi_password = value,
            SettingsField::MqttEnabled(value) => self.mqtt_enabled = value,
            SettingsField::MqttHost(value) => self.mqtt_host = value,
            SettingsField::MqttPort(value) => self.mqtt_port = value,
            SettingsField::MqttTopic(value) => self.mqtt_topic = value,
            SettingsField::LedPin(value) => self.led_pin = value,
        }
    }

    pub fn wifi_ready(&self) -> bool {
        self.wifi_enabled && !self.wifi_ssid.trim().is_empty()
    }

    /// Unchecks MQTT while WiFi is not ready. Returns whether it changed.
    pub fn enforce_dependencies(&mut self) -> bool {
        if self.mqtt_enabled && !self.wifi_ready() {
            self.mqtt_enabled = false;
            return true;
        }
        false
    }

    /// Canonical settings for the current inputs.
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings {
            wifi_enabled: self.wifi_enabled,
            wifi_ssid: self.wifi_ssid.trim().to_string(),
            wifi_password: self.wifi_password.clone(),
            mqtt_enabled: self.mqtt_enabled,
            mqtt_host: self.mqtt_host.trim().to_string(),
            mqtt_port: self
                .mqtt_port
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .unwrap_or(DEFAULT_MQTT_PORT),
            mqtt_topic: self.mqtt_topic.trim().to_string(),
            led_pin: self.led_pin.trim().parse().unwrap_or(DEFAULT_LED_PIN),
        };
        settings.enforce_dependencies();
        settings
    }

    pub fn gate(&self) -> SettingsGate {
        let wifi_ready = self.wifi_ready();
        SettingsGate {
            wifi_fields_enabled: self.wifi_enabled,
            mqtt_toggle_enabled: wifi_ready,
            mqtt_fields_enabled: wifi_ready && self.mqtt_enabled,
            mqtt_note: if wifi_ready {
                "Tell me which topic to listen to."
            } else {
                "Add external WiFi to unlock MQTT."
            },
        }
    }
}

/// Which parts of the settings form accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsGate {
    pub wifi_fields_enabled: bool,
    pub mqtt_toggle_enabled: bool,
    pub mqtt_fields_enabled: bool,
    pub mqtt_note: &'static str,
}
