//! [`HttpTransport`] – reqwest-backed device transport.
//!
//! Construct once per device and reuse across calls; the underlying
//! `reqwest::Client` pools connections. Self-signed certificates are
//! accepted because the devices this gateway fronts commonly serve their
//! status endpoints over untrusted local TLS.

use async_trait::async_trait;
use tracing::debug;

use lumen_types::{Credentials, HttpMethod};

use crate::{Transport, TransportError};

/// Production [`Transport`] speaking HTTP(S) to the device.
pub struct HttpTransport {
    client: reqwest::Client,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    /// Create a transport, optionally authenticating every request with
    /// the given basic-auth credentials.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Init`] if the TLS backend cannot be
    /// initialised.
    pub fn new(credentials: Option<Credentials>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(TransportError::Init)?;
        Ok(Self { client, credentials })
    }

    fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, url: &str, body: &str, method: HttpMethod) -> Result<String, TransportError> {
        debug!(%url, %method, "device request");

        let mut request = self
            .client
            .request(Self::to_reqwest_method(method), url)
            .body(body.to_string());
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })
    }
}
