use rsa::RsaPublicKey;

use crate::domain::key_pair::KeyPair;
use crate::domain::payload::{Ciphertext, Payload};
use crate::error::Result;

/// Port for encrypting a payload to a public key and decrypting it with the key pair.
pub trait PayloadCipher {
    fn encrypt(&self, public_key: &RsaPublicKey, payload: &Payload) -> Result<Ciphertext>;

    /// `key_size` (bits) fixes the block width used to re-split `ciphertext`.
    ///
    /// Padding failures, including a key that does not match the encrypting
    /// one, are [`CenvarsError::Decryption`](crate::error::CenvarsError::Decryption).
    fn decrypt(&self, key_pair: &KeyPair, ciphertext: &[u8], key_size: usize) -> Result<Payload>;
}
