pub mod encoding;
pub mod hashing;
pub mod tokens;

pub use encoding::{decode_bytes, read_blueprint};
pub use hashing::fingerprint;
pub use tokens::estimate_tokens;
