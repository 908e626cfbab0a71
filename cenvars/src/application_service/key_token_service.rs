use crate::domain::cipher::PayloadCipher;
use crate::domain::identity::Identity;
use crate::domain::key_pair::{check_key_size, KeyPair, KeyPairGenerator};
use crate::domain::key_token::KeyToken;
use crate::domain::payload::{Ciphertext, Payload};
use crate::domain::progress::{NoopProgress, ProgressSink};
use crate::error::{CenvarsError, Result};
use crate::infrastructure::crypto::RsaChunkedCipher;
use crate::infrastructure::key_pair::OsRngKeyPairGenerator;

/// Creates key tokens and serves the publisher side of the exchange.
pub struct KeyTokenService<G, C>
where
    G: KeyPairGenerator,
    C: PayloadCipher,
{
    pub key_generator: G,
    pub cipher: C,
}

impl Default for KeyTokenService<OsRngKeyPairGenerator, RsaChunkedCipher> {
    fn default() -> Self {
        Self {
            key_generator: OsRngKeyPairGenerator,
            cipher: RsaChunkedCipher,
        }
    }
}

impl<G, C> KeyTokenService<G, C>
where
    G: KeyPairGenerator,
    C: PayloadCipher,
{
    pub fn new(key_generator: G, cipher: C) -> Self {
        Self {
            key_generator,
            cipher,
        }
    }

    /// Generates a fresh key pair and renders the token for `url`.
    ///
    /// Key generation can take seconds for large keys; `progress` receives
    /// status lines meanwhile.
    pub fn encode(
        &self,
        url: &str,
        key_size: usize,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<String> {
        let progress = progress.unwrap_or(&NoopProgress);
        if url.is_empty() {
            return Err(CenvarsError::configuration("url must not be empty"));
        }
        check_key_size(key_size)?;

        progress.notify(&format!(
            "Generating a {key_size}-bit RSA key pair, this may take a while."
        ));
        let key_pair = self.key_generator.generate_key_pair(key_size)?;
        let token = KeyToken::new(url, key_pair)?;
        progress.notify(&format!("Key generated, identity {}.", token.identity()));
        tracing::info!(identity = %token.identity(), key_size, "generated key token");

        token.encode()
    }

    /// Parses a token into its URL, key size, identity and key pair.
    pub fn decode(&self, token: &str) -> Result<(String, usize, Identity, KeyPair)> {
        KeyToken::decode(token)
            .inspect_err(|e| tracing::warn!(error = %e, "rejected key token"))
            .map(KeyToken::into_parts)
    }

    /// Encrypts `payload` for the holder of `token`, producing the blob to
    /// publish at the token's URL.
    pub fn encrypt_for_token(&self, token: &str, payload: &Payload) -> Result<Ciphertext> {
        let token = KeyToken::decode(token)?;
        tracing::debug!(identity = %token.identity(), "encrypting payload for token");
        self.cipher.encrypt(token.key_pair().public_key(), payload)
    }
}
