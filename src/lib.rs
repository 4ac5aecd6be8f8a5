pub mod buffer;
pub mod error;
pub mod hmac;
pub mod md5;

pub use buffer::ByteBuffer;
pub use error::{Error, Result};
pub use hmac::hmac_md5;
pub use md5::{md5_digest, pad, Md5State, MD5_BLOCK_LEN, MD5_DIGEST_LEN};
