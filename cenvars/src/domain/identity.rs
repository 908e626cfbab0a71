use std::fmt;

use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in an identity.
const IDENTITY_BYTES: usize = 16;
/// Length of the rendered identity (lowercase hex).
pub const IDENTITY_LEN: usize = IDENTITY_BYTES * 2;

/// Short, stable fingerprint of a public key.
///
/// Used for display and as tamper evidence inside a key token; it is not a secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// SHA-256 over the length-prefixed modulus and exponent, truncated to 16 bytes.
    pub fn derive(public_key: &RsaPublicKey) -> Self {
        let mut hasher = Sha256::new();
        for component in [public_key.n().to_bytes_be(), public_key.e().to_bytes_be()] {
            hasher.update((component.len() as u32).to_be_bytes());
            hasher.update(&component);
        }
        let digest = hasher.finalize();
        Identity(hex::encode(&digest[..IDENTITY_BYTES]))
    }

    /// Accepts only the rendered form: `IDENTITY_LEN` lowercase hex characters.
    pub fn parse(value: &str) -> Option<Self> {
        let well_formed = value.len() == IDENTITY_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Identity(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn derive_identity(public_key: &RsaPublicKey) -> Identity {
    Identity::derive(public_key)
}
