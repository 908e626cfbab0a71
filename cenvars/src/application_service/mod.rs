pub mod key_token_service;
pub mod retrieval_service;

pub use key_token_service::KeyTokenService;
pub use retrieval_service::CenvarsClient;
