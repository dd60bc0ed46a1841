//! Composite color state: the last known value of every channel, plus the
//! wire payload rules.
//!
//! The device exchanges its whole state as one delimited list in fixed
//! order `[hue, saturation, brightness, power]`. Values are `f64` so a
//! short or unparsable payload degrades to `NaN` for the affected channel
//! instead of failing the cycle; callers that need validity range-check.

use std::sync::Arc;

use tokio::sync::Mutex;

use lumen_types::Channel;

/// Snapshot of all four channel values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorState {
    values: [f64; Channel::COUNT],
}

impl ColorState {
    /// All channels zero, the startup state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of one channel.
    pub fn get(&self, channel: Channel) -> f64 {
        self.values[channel.index()]
    }

    /// Overwrite one channel, leaving the others untouched.
    pub fn set(&mut self, channel: Channel, value: f64) {
        self.values[channel.index()] = value;
    }

    /// Parse a delimited read payload in wire order. Missing or
    /// unparsable entries become `NaN`.
    pub fn parse(body: &str, delimiter: &str) -> Self {
        let mut parts = body.trim().split(delimiter);
        let mut state = Self::new();
        for channel in Channel::ALL {
            let value = parts
                .next()
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            state.set(channel, value);
        }
        state
    }

    /// Render all four values as a delimited payload in wire order.
    /// Integral values are written without a fractional suffix.
    pub fn to_payload(&self, delimiter: &str) -> String {
        Channel::ALL
            .map(|channel| format_level(self.get(channel)))
            .join(delimiter)
    }
}

fn format_level(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Shared handle to the composite state, owned jointly by the read
/// coalescer (fetch completions) and the write debouncer (staging and
/// flush snapshots). Callers never touch it directly.
///
/// The mutex is held only for the copy in or out, never across I/O.
#[derive(Clone, Default)]
pub struct ColorCache {
    inner: Arc<Mutex<ColorState>>,
}

impl ColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last confirmed or staged value of one channel.
    pub async fn get(&self, channel: Channel) -> f64 {
        self.inner.lock().await.get(channel)
    }

    /// Stage a value for one channel.
    pub async fn set(&self, channel: Channel, value: f64) {
        self.inner.lock().await.set(channel, value);
    }

    /// Copy of the full state.
    pub async fn snapshot(&self) -> ColorState {
        *self.inner.lock().await
    }

    /// Replace the full state with a freshly fetched one.
    pub async fn replace(&self, state: ColorState) {
        *self.inner.lock().await = state;
    }
}
