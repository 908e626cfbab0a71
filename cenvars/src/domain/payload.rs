use serde_json::{Map, Value};

use crate::error::{CenvarsError, Result};

/// The secret being transported: a JSON object.
///
/// `serde_json::Value` is the closed sum of string, number, boolean, null,
/// sequence and mapping. Without `preserve_order` the map is sorted, so the
/// encoding below is canonical.
pub type Payload = Map<String, Value>;

/// Concatenated fixed-width encrypted blocks, exactly as served at the token URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Ciphertext {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Ciphertext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

pub(crate) fn to_canonical_bytes(payload: &Payload) -> Result<Vec<u8>> {
    serde_json::to_vec(payload)
        .map_err(|e| CenvarsError::internal(format!("failed to encode payload: {e}")))
}

/// Failing here means the decrypted bytes were not produced by
/// [`to_canonical_bytes`], which is a framing bug rather than a decryption failure.
pub(crate) fn from_canonical_bytes(bytes: &[u8]) -> Result<Payload> {
    serde_json::from_slice(bytes).map_err(|e| {
        CenvarsError::internal(format!("decrypted bytes are not a JSON object: {e}"))
    })
}
