use crate::domain::cipher::PayloadCipher;
use crate::domain::key_token::KeyToken;
use crate::domain::payload::Payload;
use crate::domain::progress::{NoopProgress, ProgressSink};
use crate::error::{CenvarsError, Result};
use crate::infrastructure::config::{CenvarsConfig, ConfigSource};
use crate::infrastructure::crypto::RsaChunkedCipher;
use crate::infrastructure::transport::{HttpTransport, UreqTransport};

/// Fetches and decrypts the payload a key token points at.
///
/// Flow:
/// 1. reject an absent or empty token
/// 2. decode the token
/// 3. GET the embedded URL once
/// 4. decrypt the body with the embedded key
///
/// Errors from each step are returned unchanged.
pub struct CenvarsClient<T, C>
where
    T: HttpTransport,
    C: PayloadCipher,
{
    transport: T,
    cipher: C,
    config: CenvarsConfig,
}

impl CenvarsClient<UreqTransport, RsaChunkedCipher> {
    /// Client backed by `ureq`, configured from `config`.
    pub fn from_config(config: CenvarsConfig) -> Self {
        let transport = UreqTransport::from_config(&config.transport);
        Self::with_parts(transport, RsaChunkedCipher, config)
    }
}

impl Default for CenvarsClient<UreqTransport, RsaChunkedCipher> {
    fn default() -> Self {
        Self::from_config(CenvarsConfig::default())
    }
}

impl<T, C> CenvarsClient<T, C>
where
    T: HttpTransport,
    C: PayloadCipher,
{
    pub fn with_parts(transport: T, cipher: C, config: CenvarsConfig) -> Self {
        Self {
            transport,
            cipher,
            config,
        }
    }

    pub fn config(&self) -> &CenvarsConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, token: Option<&str>, progress: Option<&dyn ProgressSink>) -> Result<Payload> {
        let progress = progress.unwrap_or(&NoopProgress);
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
            CenvarsError::configuration(format!(
                "no key token given; set {}",
                self.config.key_variable
            ))
        })?;

        let token = KeyToken::decode(token)
            .inspect_err(|e| tracing::warn!(error = %e, "rejected key token"))?;

        progress.notify(&format!("Fetching {}", token.url()));
        tracing::info!(identity = %token.identity(), "fetching payload");
        let body = self.transport.get(token.url())?;

        progress.notify(&format!("Decrypting {} bytes", body.len()));
        let payload = self
            .cipher
            .decrypt(token.key_pair(), &body, token.key_size())
            .inspect_err(|e| tracing::warn!(error = %e, "payload did not decrypt"))?;
        tracing::info!(entries = payload.len(), "payload retrieved");
        Ok(payload)
    }

    /// Same as [`get`](Self::get) with the token read from `source` under the
    /// configured `key_variable`.
    pub fn get_from_source(
        &self,
        source: &dyn ConfigSource,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<Payload> {
        let token = self.config.token_from(source)?;
        self.get(Some(token.as_str()), progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::infrastructure::config::MapConfigSource;

    struct UnreachableTransport;

    impl HttpTransport for UnreachableTransport {
        fn get(&self, url: &str) -> std::result::Result<Vec<u8>, TransportError> {
            panic!("transport must not be called, got {url}")
        }
    }

    fn client() -> CenvarsClient<UnreachableTransport, RsaChunkedCipher> {
        CenvarsClient::with_parts(
            UnreachableTransport,
            RsaChunkedCipher,
            CenvarsConfig::default(),
        )
    }

    #[test]
    fn missing_token_is_configuration_error() {
        let err = client().get(None, None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("CENVARS_KEY"));
    }

    #[test]
    fn blank_token_is_configuration_error() {
        assert!(client().get(Some(""), None).unwrap_err().is_configuration());
        assert!(client().get(Some("  "), None).unwrap_err().is_configuration());
    }

    #[test]
    fn malformed_token_never_reaches_transport() {
        let err = client().get(Some("cenvars1.a.b.c.d"), None).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn unset_source_variable_is_configuration_error() {
        let err = client()
            .get_from_source(&MapConfigSource::new(), None)
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
