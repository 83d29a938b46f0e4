pub const API_PAW: &str = "/api/paw";
pub const API_SETTINGS: &str = "/api/settings";
pub const API_MODE: &str = "/api/mode";

pub const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
