pub mod config;
pub mod crypto;
pub mod key_pair;
pub mod progress;
pub mod transport;

pub use config::{CenvarsConfig, ConfigSource, EnvConfigSource, MapConfigSource, TransportConfig};
pub use crypto::RsaChunkedCipher;
pub use key_pair::OsRngKeyPairGenerator;
pub use progress::TracingProgress;
pub use transport::{HttpTransport, UreqTransport};
