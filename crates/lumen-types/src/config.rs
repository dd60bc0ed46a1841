//! Typed per-device configuration.
//!
//! Replaces the duck-typed configuration object of ad-hoc HTTP light
//! integrations with explicit structs and serde defaults. Validation of
//! addresses and credentials happens upstream (in the host shell); the
//! core consumes these structs as-is.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Credentials, HttpMethod};

/// Configuration for one HTTP-controlled light device.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Human-readable device name, used in logs and CLI output.
    pub name: String,

    /// Default HTTP method for write calls. Individual sections may
    /// override it.
    #[serde(default)]
    pub http_method: HttpMethod,

    /// Basic-auth username. Empty means no authentication.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    /// Basic-auth password.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    /// Composite color state endpoints. Absent means the device has no
    /// color control and channel requests are rejected.
    #[serde(default)]
    pub color: Option<ColorConfig>,

    /// Optional temperature sensor endpoint.
    #[serde(default)]
    pub temperature: Option<TemperatureConfig>,
}

impl DeviceConfig {
    /// Credentials for the transport, or `None` when no username is set.
    pub fn credentials(&self) -> Option<Credentials> {
        if self.username.is_empty() {
            return None;
        }
        Some(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

impl std::fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("name", &self.name)
            .field("http_method", &self.http_method)
            .field("username", &self.username)
            .field(
                "password",
                if self.password.is_empty() { &"<not set>" } else { &"<redacted>" },
            )
            .field("color", &self.color)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Composite color state section of a [`DeviceConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    /// URL the composite state is read from.
    pub status_url: String,

    /// URL template writes are sent to. A `%s` placeholder is replaced
    /// with the delimited composite value. Defaults to `status_url`.
    #[serde(default)]
    pub set_url: Option<String>,

    /// HTTP method for write calls. Defaults to the device-level method.
    #[serde(default)]
    pub http_method: Option<HttpMethod>,

    /// Separator between channel values in payloads and URL templates.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// How long a successfully fetched state stays fresh, in milliseconds.
    #[serde(default = "default_cache_time_ms")]
    pub cache_time_ms: u64,

    /// Debounce window for writes, in milliseconds. The flush fires this
    /// long after the first write of a burst.
    #[serde(default = "default_set_limiter_time_ms")]
    pub set_limiter_time_ms: u64,
}

impl ColorConfig {
    /// The effective write URL template.
    pub fn write_url(&self) -> &str {
        self.set_url.as_deref().unwrap_or(&self.status_url)
    }

    /// The effective write method, given the device-level default.
    pub fn write_method(&self, device_default: HttpMethod) -> HttpMethod {
        self.http_method.unwrap_or(device_default)
    }

    /// Freshness window as a [`Duration`].
    pub fn cache_time(&self) -> Duration {
        Duration::from_millis(self.cache_time_ms)
    }

    /// Debounce window as a [`Duration`].
    pub fn set_limiter_time(&self) -> Duration {
        Duration::from_millis(self.set_limiter_time_ms)
    }
}

/// Temperature sensor section of a [`DeviceConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureConfig {
    /// Sensor display name.
    #[serde(default = "default_temperature_name")]
    pub name: String,

    /// URL the JSON temperature payload is read from.
    pub url: String,

    /// Lowest reading accepted as valid, in °C.
    #[serde(default = "default_min_c")]
    pub min_c: f64,

    /// Highest reading accepted as valid, in °C.
    #[serde(default = "default_max_c")]
    pub max_c: f64,
}

fn default_delimiter() -> String {
    ",".to_string()
}
fn default_cache_time_ms() -> u64 {
    500
}
fn default_set_limiter_time_ms() -> u64 {
    50
}
fn default_temperature_name() -> String {
    "Temperature".to_string()
}
fn default_min_c() -> f64 {
    -100.0
}
fn default_max_c() -> f64 {
    100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_color_toml() -> ColorConfig {
        toml::from_str("status_url = \"http://light.local/color\"").unwrap()
    }

    #[test]
    fn color_defaults_match_contract() {
        let cfg = minimal_color_toml();
        assert_eq!(cfg.delimiter, ",");
        assert_eq!(cfg.cache_time_ms, 500);
        assert_eq!(cfg.set_limiter_time_ms, 50);
        assert_eq!(cfg.cache_time(), Duration::from_millis(500));
        assert_eq!(cfg.set_limiter_time(), Duration::from_millis(50));
    }

    #[test]
    fn write_url_falls_back_to_status_url() {
        let mut cfg = minimal_color_toml();
        assert_eq!(cfg.write_url(), "http://light.local/color");

        cfg.set_url = Some("http://light.local/set/%s".to_string());
        assert_eq!(cfg.write_url(), "http://light.local/set/%s");
    }

    #[test]
    fn write_method_falls_back_to_device_default() {
        let mut cfg = minimal_color_toml();
        assert_eq!(cfg.write_method(HttpMethod::Post), HttpMethod::Post);

        cfg.http_method = Some(HttpMethod::Put);
        assert_eq!(cfg.write_method(HttpMethod::Post), HttpMethod::Put);
    }

    #[test]
    fn device_config_parses_full_toml() {
        let raw = r#"
            name = "Living Room"
            http_method = "POST"
            username = "admin"
            password = "secret"

            [color]
            status_url = "http://light.local/color"
            set_url = "http://light.local/set/%s"
            cache_time_ms = 250

            [temperature]
            url = "http://light.local/temp"
        "#;
        let cfg: DeviceConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.name, "Living Room");
        assert_eq!(cfg.http_method, HttpMethod::Post);

        let color = cfg.color.as_ref().unwrap();
        assert_eq!(color.cache_time_ms, 250);
        assert_eq!(color.set_limiter_time_ms, 50);

        let temp = cfg.temperature.as_ref().unwrap();
        assert_eq!(temp.name, "Temperature");
        assert!((temp.min_c - (-100.0)).abs() < f64::EPSILON);
        assert!((temp.max_c - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn device_without_color_section_parses() {
        let cfg: DeviceConfig = toml::from_str("name = \"Bare\"").unwrap();
        assert!(cfg.color.is_none());
        assert!(cfg.temperature.is_none());
        assert_eq!(cfg.http_method, HttpMethod::Get);
        assert!(cfg.credentials().is_none());
    }

    #[test]
    fn credentials_require_username() {
        let cfg: DeviceConfig = toml::from_str(
            "name = \"Auth\"\nusername = \"admin\"\npassword = \"pw\"",
        )
        .unwrap();
        let creds = cfg.credentials().unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn device_config_debug_redacts_password() {
        let cfg: DeviceConfig = toml::from_str(
            "name = \"Auth\"\nusername = \"admin\"\npassword = \"super-secret\"",
        )
        .unwrap();
        let debug_str = format!("{:?}", cfg);
        assert!(!debug_str.contains("super-secret"), "password must not appear in debug output");
        assert!(debug_str.contains("<redacted>"));
    }
}
