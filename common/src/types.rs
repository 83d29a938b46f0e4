use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status document served by `GET /api/paw` and `POST /api/paw`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub led_on: bool,
    pub uptime_s: u64,
    #[serde(default)]
    pub ssid: String,
    pub mode: String,
}

/// Lenient view of a status-shaped response.
///
/// A field is `Some` only when the response carried it with the expected
/// type, so callers can apply each one independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPatch {
    pub led_on: Option<bool>,
    pub uptime_s: Option<u64>,
    pub ssid: Option<String>,
    pub mode: Option<String>,
}

impl StatusPatch {
    pub fn from_value(value: &Value) -> Self {
        Self {
            led_on: value.get("led_on").and_then(Value::as_bool),
            uptime_s: value.get("uptime_s").and_then(as_seconds),
            // An empty SSID means "not reported" on the device side.
            ssid: value
                .get("ssid")
                .and_then(Value::as_str)
                .filter(|ssid| !ssid.is_empty())
                .map(str::to_string),
            mode: value.get("mode").and_then(Value::as_str).map(str::to_string),
        }
    }
}

impl From<DeviceStatus> for StatusPatch {
    fn from(status: DeviceStatus) -> Self {
        Self {
            led_on: Some(status.led_on),
            uptime_s: Some(status.uptime_s),
            ssid: Some(status.ssid).filter(|ssid| !ssid.is_empty()),
            mode: Some(status.mode),
        }
    }
}

fn as_seconds(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
            .map(|seconds| seconds.floor() as u64)
    })
}

/// Body of `POST /api/mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

/// Echo returned by the device after a mode change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeEcho {
    pub mode: Option<String>,
}

impl ModeEcho {
    pub fn from_value(value: &Value) -> Self {
        Self {
            mode: value.get("mode").and_then(Value::as_str).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Live,
    Simulated,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Simulated => "simulated",
        }
    }

    pub fn is_simulated(self) -> bool {
        self == Self::Simulated
    }
}

/// Belief about device reachability, derived from the latest transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Ok,
    Mock,
    Down,
}

impl ConnectionState {
    /// State after a successful call on the given transport.
    pub fn reachable(kind: TransportKind) -> Self {
        match kind {
            TransportKind::Live => Self::Ok,
            TransportKind::Simulated => Self::Mock,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Mock => "mock",
            Self::Down => "down",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "awake",
            Self::Mock => "dreaming",
            Self::Down => "sniffing...",
        }
    }
}

/// Locally applied device fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    led_on: bool,
    uptime_s: Option<u64>,
    ssid: Option<String>,
}

impl DeviceState {
    pub fn led_on(&self) -> bool {
        self.led_on
    }

    pub fn uptime_s(&self) -> Option<u64> {
        self.uptime_s
    }

    pub fn ssid(&self) -> Option<&str> {
        self.ssid.as_deref()
    }

    /// Applies every field the patch carries and leaves the others alone.
    pub fn apply(&mut self, patch: &StatusPatch) {
        if let Some(led_on) = patch.led_on {
            self.led_on = led_on;
        }
        if let Some(uptime_s) = patch.uptime_s {
            self.uptime_s = Some(uptime_s);
        }
        if let Some(ssid) = &patch.ssid {
            self.ssid = Some(ssid.clone());
        }
    }

    pub fn view(&self) -> DeviceView {
        DeviceView {
            led_on: self.led_on,
            uptime_s: self.uptime_s,
            uptime: self.uptime_s.map(format_uptime),
            ssid: self.ssid.clone(),
            toggle_caption: if self.led_on {
                "Paw to switch off"
            } else {
                "Paw to switch on"
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceView {
    pub led_on: bool,
    pub uptime_s: Option<u64>,
    pub uptime: Option<String>,
    pub ssid: Option<String>,
    pub toggle_caption: &'static str,
}

/// Renders uptime as `Xd Yh Zm`, dropping leading zero units and seconds.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn formats_uptime() {
        assert_eq!(format_uptime(0), "0m");
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(300), "5m");
        assert_eq!(format_uptime(3_700), "1h 1m");
        assert_eq!(format_uptime(90_005), "1d 1h 0m");
    }

    #[test]
    fn patch_skips_missing_and_mistyped_fields() {
        let patch = StatusPatch::from_value(&json!({
            "led_on": "yes",
            "uptime_s": 42,
            "mode": "purr",
        }));

        assert_eq!(
            patch,
            StatusPatch {
                led_on: None,
                uptime_s: Some(42),
                ssid: None,
                mode: Some("purr".to_string()),
            }
        );
    }

    #[test]
    fn patch_ignores_empty_ssid_and_negative_uptime() {
        let patch = StatusPatch::from_value(&json!({
            "led_on": true,
            "uptime_s": -3,
            "ssid": "",
        }));

        assert_eq!(patch.led_on, Some(true));
        assert_eq!(patch.uptime_s, None);
        assert_eq!(patch.ssid, None);
    }

    #[test]
    fn apply_keeps_ssid_when_response_omits_it() {
        let mut state = DeviceState::default();
        state.apply(&StatusPatch::from(DeviceStatus {
            led_on: true,
            uptime_s: 12,
            ssid: "MeowMeow".to_string(),
            mode: "static".to_string(),
        }));
        state.apply(&StatusPatch::from_value(&json!({ "mode": "blink" })));

        assert!(state.led_on());
        assert_eq!(state.ssid(), Some("MeowMeow"));
        assert_eq!(state.view().uptime.as_deref(), Some("0m"));
        assert_eq!(state.view().toggle_caption, "Paw to switch off");
    }

    #[test]
    fn connection_labels() {
        assert_eq!(ConnectionState::reachable(TransportKind::Live), ConnectionState::Ok);
        assert_eq!(
            ConnectionState::reachable(TransportKind::Simulated).label(),
            "dreaming"
        );
        assert_eq!(ConnectionState::Down.as_str(), "down");
    }
}
