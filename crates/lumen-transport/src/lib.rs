//! `lumen-transport` – the request/response seam to the physical device.
//!
//! The gateway never talks HTTP directly. It calls the [`Transport`] trait,
//! and an implementation translates that into the outside world:
//!
//! - [`HttpTransport`][http::HttpTransport] – production implementation
//!   backed by `reqwest`, with optional basic auth.
//! - [`SimTransport`][sim::SimTransport] – scripted in-memory device for
//!   tests and demos; records every call and simulates latency.
//!
//! One call maps to exactly one request against the device. The gateway's
//! coalescing layer guarantees it never issues a second call of the same
//! direction while one is outstanding, so implementations do not need to
//! parallelize.

use async_trait::async_trait;
use thiserror::Error;

use lumen_types::{HttpMethod, LumenError};

pub mod http;
pub mod sim;

pub use http::HttpTransport;
pub use sim::{SimCall, SimTransport};

/// Errors produced by a transport implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Init(#[source] reqwest::Error),

    /// The request never produced a response (connection refused, DNS
    /// failure, timeout enforced by the client, …).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with a non-success status code.
    #[error("device returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// A scripted failure from the simulated device.
    #[error("{0}")]
    Scripted(String),
}

impl From<TransportError> for LumenError {
    fn from(err: TransportError) -> Self {
        LumenError::Transport(err.to_string())
    }
}

/// One request, one reply, against a single slow device.
///
/// Implementations must resolve exactly once per invocation: either the
/// response body or a [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request and return the response body.
    async fn call(&self, url: &str, body: &str, method: HttpMethod) -> Result<String, TransportError>;
}
