//! [`SimTransport`] – scripted in-memory device.
//!
//! Lets the full gateway run in headless tests without any physical
//! hardware. Responses are queued up front with [`SimTransport::push_ok`] /
//! [`SimTransport::push_err`]; every call is recorded and can be inspected
//! afterwards with [`SimTransport::calls`].
//!
//! A configurable latency is slept before each reply, so tests running
//! under tokio's paused clock can hold a call "in flight" while further
//! requests arrive.
//!
//! # Example
//!
//! ```rust
//! use lumen_transport::{SimTransport, Transport};
//! use lumen_types::HttpMethod;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let sim = SimTransport::new();
//! sim.push_ok("10,50,80,1");
//!
//! let body = sim.call("http://sim/color", "", HttpMethod::Get).await.unwrap();
//! assert_eq!(body, "10,50,80,1");
//! assert_eq!(sim.call_count(), 1);
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use lumen_types::HttpMethod;

use crate::{Transport, TransportError};

/// One recorded request against the simulated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimCall {
    pub url: String,
    pub body: String,
    pub method: HttpMethod,
}

/// Scripted [`Transport`] implementation. Always answers from its queued
/// script; an exhausted script is reported as a transport error rather
/// than a panic so misbehaving tests fail visibly.
#[derive(Default)]
pub struct SimTransport {
    latency: Duration,
    script: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<SimCall>>,
}

impl SimTransport {
    /// Create a simulator that replies instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator that sleeps `latency` before every reply.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Queue a successful response body.
    pub fn push_ok(&self, body: &str) {
        self.script().push_back(Ok(body.to_string()));
    }

    /// Queue a failure with the given reason.
    pub fn push_err(&self, reason: &str) {
        self.script().push_back(Err(reason.to_string()));
    }

    /// All calls recorded so far, in arrival order.
    pub fn calls(&self) -> Vec<SimCall> {
        self.recorded().clone()
    }

    /// Number of calls recorded so far.
    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        // Recover from poisoning: the script itself stays consistent.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn recorded(&self) -> std::sync::MutexGuard<'_, Vec<SimCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for SimTransport {
    async fn call(&self, url: &str, body: &str, method: HttpMethod) -> Result<String, TransportError> {
        self.recorded().push(SimCall {
            url: url.to_string(),
            body: body.to_string(),
            method,
        });

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.script().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(TransportError::Scripted(reason)),
            None => Err(TransportError::Scripted(
                "sim transport script exhausted".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_follow_script_order() {
        let sim = SimTransport::new();
        sim.push_ok("first");
        sim.push_err("device offline");
        sim.push_ok("second");

        assert_eq!(sim.call("http://sim/a", "", HttpMethod::Get).await.unwrap(), "first");
        assert!(sim.call("http://sim/b", "", HttpMethod::Get).await.is_err());
        assert_eq!(sim.call("http://sim/c", "", HttpMethod::Post).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn records_every_call() {
        let sim = SimTransport::new();
        sim.push_ok("ok");
        sim.push_ok("ok");

        sim.call("http://sim/color", "", HttpMethod::Get).await.unwrap();
        sim.call("http://sim/set/1,2,3,4", "", HttpMethod::Put).await.unwrap();

        let calls = sim.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, "http://sim/color");
        assert_eq!(calls[0].method, HttpMethod::Get);
        assert_eq!(calls[1].url, "http://sim/set/1,2,3,4");
        assert_eq!(calls[1].method, HttpMethod::Put);
    }

    #[tokio::test]
    async fn exhausted_script_is_an_error_not_a_panic() {
        let sim = SimTransport::new();
        let result = sim.call("http://sim/color", "", HttpMethod::Get).await;
        match result {
            Err(TransportError::Scripted(reason)) => assert!(reason.contains("exhausted")),
            other => panic!("expected scripted error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated_on_the_paused_clock() {
        let sim = SimTransport::with_latency(Duration::from_millis(100));
        sim.push_ok("late");

        let started = tokio::time::Instant::now();
        sim.call("http://sim/color", "", HttpMethod::Get).await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(100));
    }
}
