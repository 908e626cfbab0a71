//! HTTP retrieval of the encrypted payload.

use std::time::Duration;

use ureq::Agent;
use url::Url;

use crate::error::TransportError;
use crate::infrastructure::config::TransportConfig;

/// A single blocking GET. Implementations own retry and timeout policy; the
/// retrieval flow calls `get` exactly once and reports its error verbatim.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(url)
    }
}

/// `ureq`-backed transport. Non-2xx responses become [`TransportError::Status`].
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let config = Agent::config_builder().timeout_global(timeout).build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::with_timeout(config.timeout_secs.map(Duration::from_secs))
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let parsed = parse_http_url(url)?;
        tracing::debug!(host = parsed.host_str().unwrap_or_default(), "fetching payload");

        let mut response = self
            .agent
            .get(parsed.as_str())
            .call()
            .map_err(map_ureq_error)?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

fn parse_http_url(url: &str) -> Result<Url, TransportError> {
    let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(TransportError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::StatusCode(code) => TransportError::Status(code),
        other => TransportError::Request(other.to_string()),
    }
}
