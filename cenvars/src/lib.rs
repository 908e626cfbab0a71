//! Central environment variables.
//!
//! A publisher hosts an encrypted JSON object at a URL; consumers hold one
//! key token (typically in the `CENVARS_KEY` environment variable) that
//! carries the URL, the RSA key pair and an identity fingerprint. With the
//! token alone a consumer can fetch and decrypt the payload.
//!
//! ```no_run
//! use cenvars::{create_key, decode_key, encrypt, get};
//!
//! let token = create_key("https://example.com/cenvars", 2048, None)?;
//! let (_url, _key_size, _identity, key_pair) = decode_key(&token)?;
//!
//! let mut payload = cenvars::Payload::new();
//! payload.insert("DATABASE_URL".into(), "postgres://db/app".into());
//! let blob = encrypt(key_pair.public_key(), &payload)?;
//! // host `blob` at the URL, then on the consumer side:
//! let _fetched = get(Some(token.as_str()), None)?;
//! # Ok::<(), cenvars::CenvarsError>(())
//! ```

pub mod application_service;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application_service::{CenvarsClient, KeyTokenService};
pub use domain::{
    derive_identity, Ciphertext, Identity, KeyPair, KeyPairGenerator, KeyToken, NoopProgress,
    Payload, PayloadCipher, ProgressSink,
};
pub use error::{CenvarsError, Result, TransportError};
pub use infrastructure::{
    CenvarsConfig, ConfigSource, EnvConfigSource, HttpTransport, MapConfigSource,
    OsRngKeyPairGenerator, RsaChunkedCipher, TracingProgress, UreqTransport,
};

use rsa::RsaPublicKey;

/// Generates a key pair of `key_size` bits and returns the token for `url`.
pub fn create_key(
    url: &str,
    key_size: usize,
    progress: Option<&dyn ProgressSink>,
) -> Result<String> {
    KeyTokenService::new(OsRngKeyPairGenerator, RsaChunkedCipher).encode(url, key_size, progress)
}

/// Splits a token into URL, key size, identity and key pair.
pub fn decode_key(token: &str) -> Result<(String, usize, Identity, KeyPair)> {
    KeyTokenService::new(OsRngKeyPairGenerator, RsaChunkedCipher).decode(token)
}

pub fn encrypt(public_key: &RsaPublicKey, payload: &Payload) -> Result<Ciphertext> {
    RsaChunkedCipher.encrypt(public_key, payload)
}

pub fn decrypt(key_pair: &KeyPair, ciphertext: &[u8], key_size: usize) -> Result<Payload> {
    RsaChunkedCipher.decrypt(key_pair, ciphertext, key_size)
}

/// Fetches and decrypts the payload for `token` over HTTP.
pub fn get(token: Option<&str>, progress: Option<&dyn ProgressSink>) -> Result<Payload> {
    CenvarsClient::from_config(CenvarsConfig::default()).get(token, progress)
}

/// Like [`get`], reading the token from the environment (and `.env`) under
/// the default variable name.
pub fn get_from_env(progress: Option<&dyn ProgressSink>) -> Result<Payload> {
    let source = EnvConfigSource::with_dotenv();
    CenvarsClient::from_config(CenvarsConfig::default()).get_from_source(&source, progress)
}
