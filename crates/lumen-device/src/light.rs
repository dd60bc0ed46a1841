//! [`Light`] – per-device facade.
//!
//! Owns the shared color cache, the two coalescers, and the optional
//! temperature reader for one device, and routes caller requests into
//! them. Requests against an unconfigured section are rejected before any
//! coalescer or transport state is touched.

use std::sync::Arc;

use tracing::warn;

use lumen_transport::Transport;
use lumen_types::{Channel, DeviceConfig, LumenError};

use crate::read::ReadCoalescer;
use crate::state::ColorCache;
use crate::temperature::TemperatureReader;
use crate::write::WriteDebouncer;

struct ColorControl {
    reads: ReadCoalescer,
    writes: WriteDebouncer,
}

/// One HTTP-controlled light device.
///
/// Reads and writes are independent directions: a fetch and a flush may
/// be in flight at the same time, meeting only in the shared cache.
pub struct Light {
    name: String,
    color: Option<ColorControl>,
    temperature: Option<TemperatureReader>,
}

impl Light {
    /// Wire up a device from its configuration and a transport.
    pub fn new(config: &DeviceConfig, transport: Arc<dyn Transport>) -> Self {
        let color = config.color.as_ref().map(|color_config| {
            let cache = ColorCache::new();
            ColorControl {
                reads: ReadCoalescer::new(color_config, cache.clone(), transport.clone()),
                writes: WriteDebouncer::new(
                    color_config,
                    config.http_method,
                    cache,
                    transport.clone(),
                ),
            }
        });
        let temperature = config
            .temperature
            .as_ref()
            .map(|temp_config| TemperatureReader::new(temp_config, transport.clone()));

        Self {
            name: config.name.clone(),
            color,
            temperature,
        }
    }

    /// Device display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read one channel of the composite color state.
    pub async fn get_channel(&self, channel: Channel) -> Result<f64, LumenError> {
        match &self.color {
            Some(color) => color.reads.request(channel).await,
            None => {
                warn!(device = %self.name, %channel, "ignoring channel read; color control is not configured");
                Err(LumenError::NotConfigured("color"))
            }
        }
    }

    /// Write one channel of the composite color state.
    pub async fn set_channel(&self, channel: Channel, value: f64) -> Result<(), LumenError> {
        match &self.color {
            Some(color) => color.writes.request(channel, value).await,
            None => {
                warn!(device = %self.name, %channel, "ignoring channel write; color control is not configured");
                Err(LumenError::NotConfigured("color"))
            }
        }
    }

    /// Read the attached temperature sensor.
    pub async fn temperature(&self) -> Result<f64, LumenError> {
        match &self.temperature {
            Some(sensor) => sensor.read().await,
            None => {
                warn!(device = %self.name, "ignoring temperature read; no sensor is configured");
                Err(LumenError::NotConfigured("temperature"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_transport::SimTransport;
    use lumen_types::{ColorConfig, HttpMethod, TemperatureConfig};

    fn full_config() -> DeviceConfig {
        DeviceConfig {
            name: "Living Room".to_string(),
            http_method: HttpMethod::Get,
            username: String::new(),
            password: String::new(),
            color: Some(ColorConfig {
                status_url: "http://sim/color".to_string(),
                set_url: Some("http://sim/set/%s".to_string()),
                http_method: None,
                delimiter: ",".to_string(),
                cache_time_ms: 500,
                set_limiter_time_ms: 50,
            }),
            temperature: Some(TemperatureConfig {
                name: "Temperature".to_string(),
                url: "http://sim/temp".to_string(),
                min_c: -100.0,
                max_c: 100.0,
            }),
        }
    }

    fn bare_config() -> DeviceConfig {
        DeviceConfig {
            name: "Bare".to_string(),
            http_method: HttpMethod::Get,
            username: String::new(),
            password: String::new(),
            color: None,
            temperature: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn routes_reads_and_writes_to_the_coalescers() {
        let sim = Arc::new(SimTransport::new());
        sim.push_ok("10,50,80,1");
        sim.push_ok("OK");
        let light = Light::new(&full_config(), sim.clone() as Arc<dyn Transport>);

        assert_eq!(light.get_channel(Channel::Saturation).await.unwrap(), 50.0);
        light.set_channel(Channel::Hue, 120.0).await.unwrap();

        let calls = sim.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "http://sim/color");
        // Saturation and power come from the fetched state, hue from the write.
        assert_eq!(calls[1].url, "http://sim/set/120,50,80,1");
    }

    #[tokio::test]
    async fn unconfigured_color_short_circuits_without_transport_calls() {
        let sim = Arc::new(SimTransport::new());
        let light = Light::new(&bare_config(), sim.clone() as Arc<dyn Transport>);

        assert_eq!(
            light.get_channel(Channel::Hue).await.unwrap_err(),
            LumenError::NotConfigured("color")
        );
        assert_eq!(
            light.set_channel(Channel::Hue, 120.0).await.unwrap_err(),
            LumenError::NotConfigured("color")
        );
        assert_eq!(
            light.temperature().await.unwrap_err(),
            LumenError::NotConfigured("temperature")
        );
        assert_eq!(sim.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn read_proceeds_while_a_write_window_is_pending() {
        let sim = Arc::new(SimTransport::new());
        sim.push_ok("10,50,80,1");
        sim.push_ok("OK");
        let light = Arc::new(Light::new(&full_config(), sim.clone() as Arc<dyn Transport>));

        // Arm a write window, then read before it flushes.
        let write = {
            let light = light.clone();
            tokio::spawn(async move { light.set_channel(Channel::Hue, 120.0).await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(sim.call_count(), 0, "write is still debouncing");

        // Directions are independent: the read fetches immediately.
        let value = light.get_channel(Channel::Brightness).await.unwrap();
        assert_eq!(value, 80.0);

        write.await.unwrap().unwrap();
        let calls = sim.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "http://sim/color");
        // The fetch completed before the flush and overwrote the staged
        // hue with the device's confirmed state.
        assert_eq!(calls[1].url, "http://sim/set/10,50,80,1");
    }

    #[tokio::test(start_paused = true)]
    async fn temperature_routes_to_the_sensor() {
        let sim = Arc::new(SimTransport::new());
        sim.push_ok(r#"{"temperature": 19.0}"#);
        let light = Light::new(&full_config(), sim.clone() as Arc<dyn Transport>);
        assert_eq!(light.temperature().await.unwrap(), 19.0);
        assert_eq!(light.name(), "Living Room");
    }
}
