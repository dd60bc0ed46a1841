//! `lumen-types` – shared vocabulary for the Lumen light gateway.
//!
//! Everything the other crates agree on lives here: the [`Channel`] set that
//! makes up a device's composite color state, the [`HttpMethod`] the
//! transport speaks, the [`LumenError`] taxonomy, and the typed
//! per-device configuration in [`config`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;

pub use config::{ColorConfig, DeviceConfig, TemperatureConfig};

/// One named numeric component of a device's composite color state.
///
/// The four channels are read from and written to the device as a single
/// delimited payload in the fixed wire order
/// `[hue, saturation, brightness, power]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Hue,
    Saturation,
    Brightness,
    Power,
}

impl Channel {
    /// All channels, in wire order.
    pub const ALL: [Channel; 4] = [
        Channel::Hue,
        Channel::Saturation,
        Channel::Brightness,
        Channel::Power,
    ];

    /// Number of channels in the composite state.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this channel within the wire payload.
    pub fn index(self) -> usize {
        match self {
            Channel::Hue => 0,
            Channel::Saturation => 1,
            Channel::Brightness => 2,
            Channel::Power => 3,
        }
    }

    /// Parse a channel from its lowercase name, e.g. `"hue"`.
    ///
    /// Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Channel> {
        match name {
            "hue" => Some(Channel::Hue),
            "saturation" => Some(Channel::Saturation),
            "brightness" => Some(Channel::Brightness),
            "power" => Some(Channel::Power),
            _ => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Hue => write!(f, "hue"),
            Channel::Saturation => write!(f, "saturation"),
            Channel::Brightness => write!(f, "brightness"),
            Channel::Power => write!(f, "power"),
        }
    }
}

/// HTTP method used for a transport call.
///
/// The device-level default applies to writes; reads always use
/// [`HttpMethod::Get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
        }
    }
}

/// Opaque credential pair handed to the transport for basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Global error type spanning configuration gaps, transport failures, and
/// rejected sensor readings.
///
/// `Transport` carries a rendered message rather than the underlying error
/// so a single failure can be cloned out to every caller waiting on the
/// same device cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LumenError {
    #[error("'{0}' is not configured for this device")]
    NotConfigured(&'static str),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid temperature reading: {0}")]
    InvalidReading(String),
}
