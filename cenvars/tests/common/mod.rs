//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;

use cenvars::{
    CenvarsClient, CenvarsConfig, CenvarsError, HttpTransport, KeyPair, KeyPairGenerator,
    KeyTokenService, Payload, RsaChunkedCipher, TransportError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rsa::RsaPrivateKey;

pub const URL: &str = "http://example.com/cenvars";

/// Deterministic stand-in for the OS-backed generator.
pub struct SeededGenerator(pub u64);

impl KeyPairGenerator for SeededGenerator {
    fn generate_key_pair(&self, key_size: usize) -> cenvars::Result<KeyPair> {
        let mut rng = StdRng::seed_from_u64(self.0);
        RsaPrivateKey::new(&mut rng, key_size)
            .map(KeyPair::from_private_key)
            .map_err(|e| CenvarsError::internal(e.to_string()))
    }
}

pub fn key_service(seed: u64) -> KeyTokenService<SeededGenerator, RsaChunkedCipher> {
    KeyTokenService::new(SeededGenerator(seed), RsaChunkedCipher)
}

/// Serves a fixed response and records every requested URL.
pub struct MockTransport {
    response: RefCell<Result<Vec<u8>, TransportError>>,
    pub requested: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn serving(body: Vec<u8>) -> Self {
        Self {
            response: RefCell::new(Ok(body)),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            response: RefCell::new(Err(error)),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn set_body(&self, body: Vec<u8>) {
        *self.response.borrow_mut() = Ok(body);
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.requested.borrow_mut().push(url.to_string());
        self.response.borrow().clone()
    }
}

pub fn client(transport: &MockTransport) -> CenvarsClient<&MockTransport, RsaChunkedCipher> {
    CenvarsClient::with_parts(transport, RsaChunkedCipher, CenvarsConfig::default())
}

pub fn payload(value: serde_json::Value) -> Payload {
    value
        .as_object()
        .cloned()
        .expect("fixture payload must be a JSON object")
}
