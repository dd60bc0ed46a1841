//! [`WriteDebouncer`] – merges rapid-fire per-channel writes into one
//! composite flush per debounce window.
//!
//! State machine: **Idle → Armed → Flushing → Idle**. The first write of a
//! window arms it and flushes after exactly the debounce delay — a fixed
//! delay from the first write, not a sliding one, so the first writer's
//! worst-case latency stays bounded while later writers in the same burst
//! ride along for free. Writes arriving while the window is armed or the
//! flush is in flight only join the waiter queue; a second device call is
//! never issued while one is outstanding.
//!
//! Every write stages its value into the shared cache immediately, so
//! reads observe the latest intended state before it reaches the device.
//! The flush sends the full composite state (all four channels), with the
//! delimited values substituted into the write URL template.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

use lumen_transport::Transport;
use lumen_types::{Channel, ColorConfig, HttpMethod, LumenError};

use crate::state::ColorCache;

/// Placeholder in the write URL template replaced by the composite value.
const URL_PLACEHOLDER: &str = "%s";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Armed,
    Flushing,
}

struct Waiter {
    channel: Channel,
    tx: oneshot::Sender<Result<(), LumenError>>,
}

struct WriteWindow {
    phase: Phase,
    waiters: Vec<Waiter>,
}

/// Serializes and time-bounds write flushes for one device.
pub struct WriteDebouncer {
    transport: Arc<dyn Transport>,
    cache: ColorCache,
    set_url: String,
    method: HttpMethod,
    delimiter: String,
    limiter_time: Duration,
    window: Mutex<WriteWindow>,
}

impl WriteDebouncer {
    pub fn new(
        config: &ColorConfig,
        device_method: HttpMethod,
        cache: ColorCache,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            cache,
            set_url: config.write_url().to_string(),
            method: config.write_method(device_method),
            delimiter: config.delimiter.clone(),
            limiter_time: config.set_limiter_time(),
            window: Mutex::new(WriteWindow {
                phase: Phase::Idle,
                waiters: Vec::new(),
            }),
        }
    }

    /// Stage `value` for `channel` and resolve once a flush covering this
    /// window has been acknowledged by the device.
    pub async fn request(&self, channel: Channel, value: f64) -> Result<(), LumenError> {
        // Stage first so reads observe the intended value right away.
        self.cache.set(channel, value).await;

        let join = {
            let mut window = self.window.lock().await;
            match window.phase {
                Phase::Idle => {
                    window.phase = Phase::Armed;
                    None
                }
                Phase::Armed | Phase::Flushing => {
                    let (tx, rx) = oneshot::channel();
                    window.waiters.push(Waiter { channel, tx });
                    debug!(%channel, value, "joined pending write window");
                    Some(rx)
                }
            }
        };

        match join {
            Some(rx) => match rx.await {
                Ok(result) => result,
                Err(_) => Err(LumenError::Transport(
                    "write flush cycle dropped before completion".to_string(),
                )),
            },
            None => self.flush(channel).await,
        }
    }

    async fn flush(&self, channel: Channel) -> Result<(), LumenError> {
        // Fixed delay from the first write of the window.
        tokio::time::sleep(self.limiter_time).await;
        self.window.lock().await.phase = Phase::Flushing;

        let payload = self.cache.snapshot().await.to_payload(&self.delimiter);
        let url = self.set_url.replacen(URL_PLACEHOLDER, &payload, 1);
        debug!(%url, %channel, "flushing staged color values");

        let outcome = self.transport.call(&url, "", self.method).await;

        let mut window = self.window.lock().await;
        window.phase = Phase::Idle;
        let waiters = std::mem::take(&mut window.waiters);
        drop(window);

        match outcome {
            Ok(_) => {
                debug!(payload = %payload, "color write acknowledged");
                for waiter in waiters {
                    debug!(channel = %waiter.channel, "acknowledging queued write");
                    let _ = waiter.tx.send(Ok(()));
                }
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, %channel, "color write failed");
                let err = LumenError::from(err);
                for waiter in waiters {
                    let _ = waiter.tx.send(Err(err.clone()));
                }
                Err(err)
            }
        }
    }
}
