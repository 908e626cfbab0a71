pub mod cipher;
pub mod identity;
pub mod key_pair;
pub mod key_token;
pub mod payload;
pub mod progress;

pub use cipher::PayloadCipher;
pub use identity::{derive_identity, Identity};
pub use key_pair::{KeyPair, KeyPairGenerator};
pub use key_token::KeyToken;
pub use payload::{Ciphertext, Payload};
pub use progress::{NoopProgress, ProgressSink};
