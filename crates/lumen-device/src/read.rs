//! [`ReadCoalescer`] – single-flight, freshness-windowed reads of the
//! composite color state.
//!
//! State machine: **Idle → Fetching → Idle**. While a fetch is in flight,
//! further callers join a waiter queue instead of triggering another
//! device call; when the fetch resolves, the triggering caller gets its
//! channel's value first and the queue is drained in arrival order. A
//! fetch younger than the freshness window is not repeated — those reads
//! are answered straight from the cache.
//!
//! On a failed fetch the freshness marker is cleared so the very next
//! request retries against the device, and every waiter receives the
//! error alongside the triggering caller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

use lumen_transport::Transport;
use lumen_types::{Channel, ColorConfig, HttpMethod, LumenError};

use crate::state::{ColorCache, ColorState};

struct Waiter {
    channel: Channel,
    tx: oneshot::Sender<Result<f64, LumenError>>,
}

struct ReadWindow {
    /// True while a device fetch is outstanding.
    in_flight: bool,
    /// Start of the most recent fetch; `None` means never fetched or the
    /// last fetch failed.
    last_update: Option<Instant>,
    waiters: Vec<Waiter>,
}

enum Admission {
    /// Caller owns this cycle and performs the fetch itself.
    Fetch,
    /// A fetch is already in flight; wait for its fan-out.
    Join(oneshot::Receiver<Result<f64, LumenError>>),
    /// Cache is fresh; value served without any device call.
    Hit(f64),
}

/// Serializes and time-bounds read refreshes for one device.
pub struct ReadCoalescer {
    transport: Arc<dyn Transport>,
    cache: ColorCache,
    status_url: String,
    delimiter: String,
    cache_time: Duration,
    window: Mutex<ReadWindow>,
}

impl ReadCoalescer {
    pub fn new(config: &ColorConfig, cache: ColorCache, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache,
            status_url: config.status_url.clone(),
            delimiter: config.delimiter.clone(),
            cache_time: config.cache_time(),
            window: Mutex::new(ReadWindow {
                in_flight: false,
                last_update: None,
                waiters: Vec::new(),
            }),
        }
    }

    /// Resolve one channel read: from the fresh cache, from a fetch
    /// already in flight, or by issuing the single fetch of a new cycle.
    pub async fn request(&self, channel: Channel) -> Result<f64, LumenError> {
        let admission = {
            let mut window = self.window.lock().await;
            if window.in_flight {
                let (tx, rx) = oneshot::channel();
                window.waiters.push(Waiter { channel, tx });
                debug!(%channel, "joined in-flight color refresh");
                Admission::Join(rx)
            } else if window
                .last_update
                .is_some_and(|at| at.elapsed() <= self.cache_time)
            {
                Admission::Hit(self.cache.get(channel).await)
            } else {
                window.in_flight = true;
                window.last_update = Some(Instant::now());
                Admission::Fetch
            }
        };

        match admission {
            Admission::Hit(value) => {
                debug!(%channel, value, "serving cached color value");
                Ok(value)
            }
            Admission::Join(rx) => match rx.await {
                Ok(result) => result,
                // The owning cycle was dropped before resolving; surface it
                // as a transport failure so the caller still resolves once.
                Err(_) => Err(LumenError::Transport(
                    "color refresh cycle dropped before completion".to_string(),
                )),
            },
            Admission::Fetch => self.fetch(channel).await,
        }
    }

    async fn fetch(&self, channel: Channel) -> Result<f64, LumenError> {
        debug!(url = %self.status_url, %channel, "refreshing color state");
        let outcome = self
            .transport
            .call(&self.status_url, "", HttpMethod::Get)
            .await;

        let mut window = self.window.lock().await;
        window.in_flight = false;
        let waiters = std::mem::take(&mut window.waiters);

        match outcome {
            Ok(body) => {
                let fetched = ColorState::parse(&body, &self.delimiter);
                self.cache.replace(fetched).await;
                drop(window);

                debug!(
                    hue = fetched.get(Channel::Hue),
                    saturation = fetched.get(Channel::Saturation),
                    brightness = fetched.get(Channel::Brightness),
                    power = fetched.get(Channel::Power),
                    "color state refreshed"
                );
                let value = fetched.get(channel);
                for waiter in waiters {
                    let _ = waiter.tx.send(Ok(fetched.get(waiter.channel)));
                }
                Ok(value)
            }
            Err(err) => {
                // Next request must retry instead of trusting this cycle.
                window.last_update = None;
                drop(window);

                warn!(error = %err, %channel, "color refresh failed");
                let err = LumenError::from(err);
                for waiter in waiters {
                    let _ = waiter.tx.send(Err(err.clone()));
                }
                Err(err)
            }
        }
    }
}
