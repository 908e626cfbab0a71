use std::fmt;

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::domain::identity::Identity;
use crate::error::{CenvarsError, Result};

/// Smallest RSA modulus accepted, in bits.
pub const MIN_KEY_SIZE: usize = 512;
/// Largest RSA modulus accepted, in bits.
pub const MAX_KEY_SIZE: usize = 4096;

pub fn is_supported_key_size(key_size: usize) -> bool {
    (MIN_KEY_SIZE..=MAX_KEY_SIZE).contains(&key_size) && key_size % 8 == 0
}

/// Rejects key sizes outside `MIN_KEY_SIZE..=MAX_KEY_SIZE` or not a multiple of 8.
pub fn check_key_size(key_size: usize) -> Result<()> {
    if is_supported_key_size(key_size) {
        Ok(())
    } else {
        Err(CenvarsError::configuration(format!(
            "unsupported key size {key_size}: expected a multiple of 8 between {MIN_KEY_SIZE} and {MAX_KEY_SIZE}"
        )))
    }
}

/// An RSA key pair. Immutable once built.
#[derive(Clone)]
pub struct KeyPair {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl KeyPair {
    pub fn from_private_key(private_key: RsaPrivateKey) -> Self {
        let public_key = RsaPublicKey::from(&private_key);
        KeyPair {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Bit length of the modulus.
    pub fn key_size(&self) -> usize {
        self.public_key.n().bits()
    }

    /// Byte length of the modulus, which is also the width of one ciphertext block.
    pub fn modulus_len(&self) -> usize {
        self.public_key.size()
    }

    pub fn identity(&self) -> Identity {
        Identity::derive(&self.public_key)
    }

    /// Serializes the private key (and with it the public key) as PKCS#1 DER.
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>> {
        let document = self
            .private_key
            .to_pkcs1_der()
            .map_err(|e| CenvarsError::internal(format!("failed to serialize key pair: {e}")))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Parses PKCS#1 DER key material and checks the RSA components are consistent.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| CenvarsError::configuration(format!("unparsable key material: {e}")))?;
        private_key
            .validate()
            .map_err(|e| CenvarsError::configuration(format!("inconsistent key material: {e}")))?;
        Ok(Self::from_private_key(private_key))
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.private_key == other.private_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_size", &self.key_size())
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}

/// Port for producing fresh key pairs.
///
/// Production code uses the OS random source; tests inject a seeded generator.
pub trait KeyPairGenerator {
    fn generate_key_pair(&self, key_size: usize) -> Result<KeyPair>;
}
