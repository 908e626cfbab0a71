use rand_core::OsRng;
use rsa::RsaPrivateKey;

use crate::domain::key_pair::{check_key_size, KeyPair, KeyPairGenerator};
use crate::error::{CenvarsError, Result};

/// Generates RSA key pairs from the operating system's secure random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRngKeyPairGenerator;

impl KeyPairGenerator for OsRngKeyPairGenerator {
    fn generate_key_pair(&self, key_size: usize) -> Result<KeyPair> {
        check_key_size(key_size)?;
        let private_key = RsaPrivateKey::new(&mut OsRng, key_size)
            .map_err(|e| CenvarsError::internal(format!("key generation failed: {e}")))?;
        Ok(KeyPair::from_private_key(private_key))
    }
}
