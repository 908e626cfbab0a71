use rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};

use crate::domain::cipher::PayloadCipher;
use crate::domain::key_pair::KeyPair;
use crate::domain::payload::{from_canonical_bytes, to_canonical_bytes, Ciphertext, Payload};
use crate::error::{CenvarsError, Result};

/// Bytes of every PKCS#1 v1.5 block consumed by padding.
pub const PKCS1_V15_OVERHEAD: usize = 11;

/// Width in bytes of one encrypted block for a modulus of `key_size` bits.
pub fn block_width(key_size: usize) -> usize {
    key_size.div_ceil(8)
}

/// Plaintext bytes one block can carry under a modulus of `modulus_len` bytes.
pub fn block_capacity(modulus_len: usize) -> usize {
    modulus_len.saturating_sub(PKCS1_V15_OVERHEAD)
}

/// RSA PKCS#1 v1.5 over a payload of any size.
///
/// The canonical payload bytes are cut into chunks of at most
/// `modulus_len - 11` bytes; each chunk is encrypted on its own into a block of
/// exactly `modulus_len` bytes and the blocks are concatenated. Fixed width is
/// the only framing, so the plaintext content can never break block boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct RsaChunkedCipher;

impl RsaChunkedCipher {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadCipher for RsaChunkedCipher {
    fn encrypt(&self, public_key: &RsaPublicKey, payload: &Payload) -> Result<Ciphertext> {
        let plaintext = to_canonical_bytes(payload)?;
        let modulus_len = public_key.size();
        let capacity = block_capacity(modulus_len);
        if capacity == 0 {
            return Err(CenvarsError::internal(
                "modulus too small for PKCS#1 v1.5 padding",
            ));
        }

        let mut rng = OsRng;
        let mut blob = Vec::with_capacity(plaintext.len().div_ceil(capacity) * modulus_len);
        for chunk in plaintext.chunks(capacity) {
            let block = public_key
                .encrypt(&mut rng, Pkcs1v15Encrypt, chunk)
                .map_err(|e| CenvarsError::internal(format!("block encryption failed: {e}")))?;
            if block.len() != modulus_len {
                return Err(CenvarsError::internal(format!(
                    "encrypted block is {} bytes, expected {modulus_len}",
                    block.len()
                )));
            }
            blob.extend_from_slice(&block);
        }

        tracing::debug!(
            plaintext_len = plaintext.len(),
            blocks = blob.len() / modulus_len,
            "encrypted payload"
        );
        Ok(Ciphertext::new(blob))
    }

    fn decrypt(&self, key_pair: &KeyPair, ciphertext: &[u8], key_size: usize) -> Result<Payload> {
        let width = block_width(key_size);
        if width != key_pair.modulus_len() {
            return Err(CenvarsError::decryption(format!(
                "key size {key_size} does not match the {}-bit key",
                key_pair.key_size()
            )));
        }
        if ciphertext.is_empty() {
            return Err(CenvarsError::decryption("ciphertext is empty"));
        }
        if ciphertext.len() % width != 0 {
            return Err(CenvarsError::decryption(format!(
                "ciphertext length {} is not a multiple of the {width}-byte block size",
                ciphertext.len()
            )));
        }

        let mut plaintext = Vec::with_capacity(ciphertext.len());
        for (index, block) in ciphertext.chunks(width).enumerate() {
            let chunk = key_pair
                .private_key()
                .decrypt(Pkcs1v15Encrypt, block)
                .map_err(|_| {
                    tracing::warn!(block = index, "block failed the padding check");
                    CenvarsError::decryption(format!("block {index} failed the padding check"))
                })?;
            plaintext.extend_from_slice(&chunk);
        }

        tracing::debug!(
            plaintext_len = plaintext.len(),
            blocks = ciphertext.len() / width,
            "decrypted payload"
        );
        from_canonical_bytes(&plaintext)
    }
}
