//! The key token: one printable string carrying everything a client needs.
//!
//! Layout, fields joined with `.`:
//!
//! ```text
//! cenvars1.<base64url(url)>.<key size>.<identity>.<base64url(PKCS#1 DER private key)>
//! ```
//!
//! base64url without padding, decimal digits and lowercase hex never contain
//! `.`, so splitting on the delimiter recovers exact field boundaries whatever
//! the URL contains.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::domain::identity::Identity;
use crate::domain::key_pair::{check_key_size, KeyPair};
use crate::error::{CenvarsError, Result};

/// Leading field identifying the token layout.
pub const TOKEN_VERSION: &str = "cenvars1";
const DELIMITER: char = '.';
const FIELD_COUNT: usize = 5;

#[derive(Clone, PartialEq)]
pub struct KeyToken {
    url: String,
    key_size: usize,
    identity: Identity,
    key_pair: KeyPair,
}

impl KeyToken {
    /// Builds a token for `url` around an existing key pair.
    pub fn new(url: impl Into<String>, key_pair: KeyPair) -> Result<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(CenvarsError::configuration("url must not be empty"));
        }
        let key_size = key_pair.key_size();
        check_key_size(key_size)?;
        let identity = key_pair.identity();
        Ok(KeyToken {
            url,
            key_size,
            identity,
            key_pair,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn into_parts(self) -> (String, usize, Identity, KeyPair) {
        (self.url, self.key_size, self.identity, self.key_pair)
    }

    /// Renders the token string.
    pub fn encode(&self) -> Result<String> {
        let der = self.key_pair.to_pkcs1_der()?;
        let fields = [
            TOKEN_VERSION.to_string(),
            URL_SAFE_NO_PAD.encode(self.url.as_bytes()),
            self.key_size.to_string(),
            self.identity.to_string(),
            URL_SAFE_NO_PAD.encode(der),
        ];
        Ok(fields.join(&DELIMITER.to_string()))
    }

    /// Parses and fully validates a token string.
    ///
    /// Every failure, structural or cryptographic, is a
    /// [`CenvarsError::Configuration`].
    pub fn decode(token: &str) -> Result<Self> {
        let fields: Vec<&str> = token.trim().split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(invalid(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }
        let [version, url, key_size, identity, key_material] = [
            fields[0], fields[1], fields[2], fields[3], fields[4],
        ];

        if version != TOKEN_VERSION {
            return Err(invalid("unknown token version"));
        }

        let url = URL_SAFE_NO_PAD
            .decode(url)
            .map_err(|e| invalid(format!("url field is not base64url: {e}")))
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|_| invalid("url field is not utf-8"))
            })?;
        if url.is_empty() {
            return Err(invalid("url field is empty"));
        }

        if key_size.is_empty() || !key_size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("key size field is not numeric"));
        }
        let key_size: usize = key_size
            .parse()
            .map_err(|_| invalid("key size field is out of range"))?;
        check_key_size(key_size)?;

        let identity =
            Identity::parse(identity).ok_or_else(|| invalid("identity field is malformed"))?;

        let der = URL_SAFE_NO_PAD
            .decode(key_material)
            .map_err(|e| invalid(format!("key field is not base64url: {e}")))?;
        let key_pair = KeyPair::from_pkcs1_der(&der)?;

        if key_pair.key_size() != key_size {
            return Err(invalid(format!(
                "key size field says {key_size} bits but the key has {}",
                key_pair.key_size()
            )));
        }
        if key_pair.identity() != identity {
            return Err(invalid("identity does not match the embedded key"));
        }

        Ok(KeyToken {
            url,
            key_size,
            identity,
            key_pair,
        })
    }
}

impl FromStr for KeyToken {
    type Err = CenvarsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl fmt::Debug for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyToken")
            .field("url", &self.url)
            .field("key_size", &self.key_size)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

fn invalid(reason: impl fmt::Display) -> CenvarsError {
    CenvarsError::configuration(format!("invalid key token: {reason}"))
}
