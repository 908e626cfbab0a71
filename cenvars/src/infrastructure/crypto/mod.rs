pub mod chunked_cipher;

pub use chunked_cipher::RsaChunkedCipher;
