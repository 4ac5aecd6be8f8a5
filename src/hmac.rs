//! DISCLAIMER: HMAC-MD5 inherits MD5's weaknesses. It is provided for
//! interoperability with systems that authenticate with MD5, not as a
//! recommendation. New designs should use HMAC over SHA-2 or a modern MAC.

use crate::buffer::ByteBuffer;
use crate::md5::{md5_digest, MD5_BLOCK_LEN, MD5_DIGEST_LEN};

/// XOR constant for the inner pad.
const IPAD_BYTE: u8 = 0x36;

/// XOR constant for the outer pad.
const OPAD_BYTE: u8 = 0x5c;

/// Computes the HMAC-MD5 of `message` under `key`.
///
/// The key is XORed against the `0x36`/`0x5c` constants to form 64-byte
/// inner and outer pads; the digest is `MD5(opad || MD5(ipad || message))`.
/// The inner and outer passes each own and pad their own buffer and share
/// no state.
///
/// Keys longer than one block (64 bytes) are truncated rather than
/// pre-hashed: only the first 64 key bytes participate, and the remainder
/// is silently ignored. This deviates from RFC 2104, which compresses long
/// keys through the hash first; the historical behavior is kept so existing
/// outputs stay stable. For keys of 64 bytes or fewer the result matches
/// the standard construction exactly.
pub fn hmac_md5(key: &[u8], message: &ByteBuffer) -> [u8; MD5_DIGEST_LEN] {
    let mut ipad = [IPAD_BYTE; MD5_BLOCK_LEN];
    let mut opad = [OPAD_BYTE; MD5_BLOCK_LEN];
    for (i, &byte) in key.iter().take(MD5_BLOCK_LEN).enumerate() {
        ipad[i] = byte ^ IPAD_BYTE;
        opad[i] = byte ^ OPAD_BYTE;
    }

    let mut inner = ByteBuffer::new();
    inner.extend_from_slice(&ipad);
    inner.extend_from_slice(message.as_slice());
    let inner_digest = md5_digest(inner);

    let mut outer = ByteBuffer::new();
    outer.extend_from_slice(&opad);
    outer.extend_from_slice(&inner_digest);
    md5_digest(outer)
}
