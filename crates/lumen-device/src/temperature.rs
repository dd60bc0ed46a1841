//! [`TemperatureReader`] – plain JSON read of an attached temperature
//! sensor.
//!
//! Unlike the color channels, temperature reads are not coalesced: the
//! sensor endpoint is cheap and callers are rare. The reading is
//! validated against the configured bounds so a glitching sensor cannot
//! report physically impossible values upstream.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use lumen_transport::Transport;
use lumen_types::{HttpMethod, LumenError, TemperatureConfig};

/// Raw shape of the sensor's JSON payload.
#[derive(Debug, Deserialize)]
struct TemperatureBody {
    temperature: f64,
}

/// Reads and validates one temperature sensor endpoint.
pub struct TemperatureReader {
    transport: Arc<dyn Transport>,
    url: String,
    min_c: f64,
    max_c: f64,
}

impl TemperatureReader {
    pub fn new(config: &TemperatureConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            url: config.url.clone(),
            min_c: config.min_c,
            max_c: config.max_c,
        }
    }

    /// Fetch the current reading in °C.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Transport`] when the sensor is unreachable and
    /// [`LumenError::InvalidReading`] when the payload is malformed or the
    /// value falls outside the configured bounds.
    pub async fn read(&self) -> Result<f64, LumenError> {
        let body = self
            .transport
            .call(&self.url, "", HttpMethod::Get)
            .await
            .map_err(|e| {
                warn!(error = %e, "temperature read failed");
                LumenError::from(e)
            })?;

        let parsed: TemperatureBody = serde_json::from_str(&body)
            .map_err(|e| LumenError::InvalidReading(format!("malformed payload: {e}")))?;

        let celsius = parsed.temperature;
        if !celsius.is_finite() || celsius < self.min_c || celsius > self.max_c {
            return Err(LumenError::InvalidReading(format!(
                "{celsius} outside accepted range {}..{}",
                self.min_c, self.max_c
            )));
        }

        debug!(celsius, "temperature read successful");
        Ok(celsius)
    }
}
