//! DISCLAIMER: This module is a from-scratch implementation of the MD5 (legacy)
//! hash function in pure Rust. MD5 is cryptographically broken; it is provided
//! for checksumming and compatibility with systems that still speak MD5, not
//! for security-sensitive operations. If you need a secure hash, use a vetted,
//! modern library (e.g. SHA-2 or SHA-3 from RustCrypto).
//!
//! The computation is one-shot: a complete [`ByteBuffer`] is padded in place
//! and compressed 64 bytes at a time. There is no incremental/streaming mode.

use crate::buffer::ByteBuffer;

/// The size of the MD5 digest in bytes (128 bits = 16 bytes).
pub const MD5_DIGEST_LEN: usize = 16;

/// The size of one compression block in bytes (512 bits = 64 bytes).
pub const MD5_BLOCK_LEN: usize = 64;

/// The initial values for (A, B, C, D) from the MD5 specification.
const INIT_A: u32 = 0x67452301;
const INIT_B: u32 = 0xefcdab89;
const INIT_C: u32 = 0x98badcfe;
const INIT_D: u32 = 0x10325476;

/// The sine table constants (K) in MD5 (32 bits).
/// K[i] = floor(2^32 * abs(sin(i+1))) for i=0..63, the "nothing-up-my-sleeve"
/// numbers published in RFC 1321.
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// The amount of left rotation performed in each MD5 step, grouped by round.
const S: [u32; 64] = [
    // Round 1
    7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,
    // Round 2
    5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,
    // Round 3
    4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,
    // Round 4
    6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,
];

/// Which of the four 16-step MD5 rounds a step belongs to. Each round pairs
/// a nonlinear mixing function with a message-word permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Round {
    /// Steps 0..16: F(b,c,d) = (b & c) | (!b & d), words in order.
    F,
    /// Steps 16..32: G(b,c,d) = (b & d) | (c & !d), words at (5i + 1) mod 16.
    G,
    /// Steps 32..48: H(b,c,d) = b ^ c ^ d, words at (3i + 5) mod 16.
    H,
    /// Steps 48..64: I(b,c,d) = c ^ (b | !d), words at 7i mod 16.
    I,
}

impl Round {
    /// The round a global step index (0..64) falls in.
    fn of_step(step: usize) -> Self {
        match step / 16 {
            0 => Round::F,
            1 => Round::G,
            2 => Round::H,
            _ => Round::I,
        }
    }

    /// The round's nonlinear function of the current B, C, D state words.
    fn mix(self, b: u32, c: u32, d: u32) -> u32 {
        match self {
            Round::F => (b & c) | (!b & d),
            Round::G => (b & d) | (c & !d),
            Round::H => b ^ c ^ d,
            Round::I => c ^ (b | !d),
        }
    }

    /// Index of the message word consumed at global step `step`.
    fn word_index(self, step: usize) -> usize {
        match self {
            Round::F => step % 16,
            Round::G => (5 * step + 1) % 16,
            Round::H => (3 * step + 5) % 16,
            Round::I => (7 * step) % 16,
        }
    }
}

/// The running state of an MD5 computation: four unsigned 32-bit words.
///
/// All additions across compression steps wrap modulo 2^32. A state is
/// created at the defined initial vector, mutated in place by
/// [`compress`](Self::compress) once per 64-byte block, and consumed into a
/// 16-byte digest by [`digest`](Self::digest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Md5State {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl Md5State {
    /// Creates a state initialized to the four fixed constants given in the
    /// MD5 algorithm. Any other starting value is non-conformant.
    pub fn new() -> Self {
        Self {
            a: INIT_A,
            b: INIT_B,
            c: INIT_C,
            d: INIT_D,
        }
    }

    /// Runs the 64 MD5 mixing steps over one 64-byte block, updating the
    /// state in place.
    ///
    /// The block is decoded into 16 little-endian 32-bit words regardless of
    /// host byte order. After the 64 steps the incoming state is added back
    /// into the result, each word modulo 2^32.
    pub fn compress(&mut self, block: &[u8; MD5_BLOCK_LEN]) {
        let mut words = [0u32; 16];
        for (i, word) in words.iter_mut().enumerate() {
            *word = u32::from_le_bytes(block[4 * i..4 * i + 4].try_into().unwrap());
        }

        let (saved_a, saved_b, saved_c, saved_d) = (self.a, self.b, self.c, self.d);

        for step in 0..64 {
            let round = Round::of_step(step);
            let mixed = round
                .mix(self.b, self.c, self.d)
                .wrapping_add(self.a)
                .wrapping_add(K[step])
                .wrapping_add(words[round.word_index(step)]);
            let rotated = mixed.rotate_left(S[step]).wrapping_add(self.b);

            // The classic state shuffle: D becomes A, the fresh value becomes
            // B, old B becomes C, old C becomes D.
            self.a = self.d;
            self.d = self.c;
            self.c = self.b;
            self.b = rotated;
        }

        self.a = self.a.wrapping_add(saved_a);
        self.b = self.b.wrapping_add(saved_b);
        self.c = self.c.wrapping_add(saved_c);
        self.d = self.d.wrapping_add(saved_d);
    }

    /// Encodes the state as the final 16-byte digest: A, then B, then C,
    /// then D, each written low-order byte first.
    pub fn digest(&self) -> [u8; MD5_DIGEST_LEN] {
        let mut output = [0u8; MD5_DIGEST_LEN];
        output[0..4].copy_from_slice(&self.a.to_le_bytes());
        output[4..8].copy_from_slice(&self.b.to_le_bytes());
        output[8..12].copy_from_slice(&self.c.to_le_bytes());
        output[12..16].copy_from_slice(&self.d.to_le_bytes());
        output
    }
}

impl Default for Md5State {
    fn default() -> Self {
        Self::new()
    }
}

/// Pads `buffer` in place, bringing its length up to a multiple of 64 bytes.
///
/// Appends the `0x80` marker byte, then `(55 - len) mod 64` zero bytes, then
/// the original length in bits as an unsigned 64-bit little-endian value.
/// When the input length is 56 mod 64 this yields 63 zero bytes, pushing the
/// length field into a following block.
pub fn pad(buffer: &mut ByteBuffer) {
    let original_len = buffer.len();
    buffer.push(0x80);

    let zeros = 55usize.wrapping_sub(original_len) % MD5_BLOCK_LEN;
    for _ in 0..zeros {
        buffer.push(0);
    }

    let bit_len = (original_len as u64).wrapping_mul(8);
    buffer.extend_from_slice(&bit_len.to_le_bytes());
}

/// Computes the MD5 digest of `buffer`, consuming it.
///
/// The buffer is padded, each successive 64-byte block is compressed in
/// order, and the final state is encoded little-endian per word. Identical
/// input bytes always yield the identical digest.
pub fn md5_digest(mut buffer: ByteBuffer) -> [u8; MD5_DIGEST_LEN] {
    pad(&mut buffer);
    log::trace!(
        "compressing {} blocks of padded input",
        buffer.len() / MD5_BLOCK_LEN
    );

    let mut state = Md5State::new();
    for block in buffer.as_slice().chunks_exact(MD5_BLOCK_LEN) {
        state.compress(block.try_into().unwrap());
    }
    state.digest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn digest_of(bytes: &[u8]) -> [u8; MD5_DIGEST_LEN] {
        md5_digest(ByteBuffer::from(bytes))
    }

    // Known test vectors from RFC 1321

    #[test]
    fn test_md5_empty() {
        // MD5("") => d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(
            hex::encode(digest_of(b"")),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_md5_a() {
        // MD5("a") => 0cc175b9c0f1b6a831c399e269772661
        assert_eq!(
            hex::encode(digest_of(b"a")),
            "0cc175b9c0f1b6a831c399e269772661"
        );
    }

    #[test]
    fn test_md5_abc() {
        // MD5("abc") => 900150983cd24fb0d6963f7d28e17f72
        assert_eq!(
            hex::encode(digest_of(b"abc")),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_md5_message_digest() {
        // MD5("message digest") => f96b697d7cb7938d525a2f31aaf161d0
        assert_eq!(
            hex::encode(digest_of(b"message digest")),
            "f96b697d7cb7938d525a2f31aaf161d0"
        );
    }

    #[test]
    fn test_md5_alphabet() {
        // MD5("abcdefghijklmnopqrstuvwxyz") => c3fcd3d76192e4007dfb496cca67e13b
        assert_eq!(
            hex::encode(digest_of(b"abcdefghijklmnopqrstuvwxyz")),
            "c3fcd3d76192e4007dfb496cca67e13b"
        );
    }

    #[test]
    fn test_md5_alphanumeric() {
        // 62 bytes, so the padding crosses into a second block.
        assert_eq!(
            hex::encode(digest_of(
                b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"
            )),
            "d174ab98d277d9f5a5611c2c9f419d9f"
        );
    }

    #[test]
    fn test_md5_eighty_digits() {
        let input = b"1234567890123456789012345678901234567890\
                      1234567890123456789012345678901234567890";
        assert_eq!(
            hex::encode(digest_of(input)),
            "57edf4a22be3c955ac49da2e2107b67a"
        );
    }

    #[test]
    fn test_pad_length_is_block_multiple() {
        for len in 0..=130 {
            let mut buffer = ByteBuffer::from(vec![0x41u8; len]);
            pad(&mut buffer);
            assert_eq!(buffer.len() % MD5_BLOCK_LEN, 0, "input length {len}");
            assert!(buffer.len() >= len + 9, "input length {len}");
        }
    }

    #[test]
    fn test_pad_layout() {
        let mut buffer = ByteBuffer::from(vec![0xAAu8; 10]);
        pad(&mut buffer);
        let padded = buffer.as_slice();
        assert_eq!(padded.len(), 64);
        assert_eq!(padded[10], 0x80);
        assert!(padded[11..56].iter().all(|&byte| byte == 0));
        // 10 bytes = 80 bits, little-endian in the trailer.
        assert_eq!(&padded[56..64], &80u64.to_le_bytes());
    }

    #[test]
    fn test_pad_at_56_byte_boundary_spills_into_next_block() {
        let mut buffer = ByteBuffer::from(vec![0x42u8; 56]);
        pad(&mut buffer);
        // 1 marker + 63 zeros + 8 length bytes: two full blocks.
        assert_eq!(buffer.len(), 128);
        assert_eq!(buffer.as_slice()[56], 0x80);
        assert!(buffer.as_slice()[57..120].iter().all(|&byte| byte == 0));
        assert_eq!(&buffer.as_slice()[120..128], &(56u64 * 8).to_le_bytes());

        // And it still digests deterministically.
        let digest = digest_of(&[0x42u8; 56]);
        assert_eq!(digest, digest_of(&[0x42u8; 56]));
    }

    #[test]
    fn test_md5_is_deterministic() {
        let input: Vec<u8> = (0u8..=255).cycle().take(1000).collect();
        assert_eq!(digest_of(&input), digest_of(&input));
    }

    #[test]
    fn test_single_bit_flip_changes_digest() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x1321);
        let input: Vec<u8> = (0..512).map(|_| rng.gen()).collect();
        let baseline = digest_of(&input);

        for _ in 0..32 {
            let byte = rng.gen_range(0..input.len());
            let bit = rng.gen_range(0..8);
            let mut flipped = input.clone();
            flipped[byte] ^= 1 << bit;
            assert_ne!(
                digest_of(&flipped),
                baseline,
                "flipping bit {bit} of byte {byte} left the digest unchanged"
            );
        }
    }

    #[test]
    fn test_state_shuffle_matches_reference_first_step() {
        // One compression of an all-zero block against the state produced by
        // hashing the empty message: pad("") is exactly one block, so
        // compressing it by hand must reproduce MD5("").
        let mut buffer = ByteBuffer::new();
        pad(&mut buffer);
        let mut state = Md5State::new();
        state.compress(buffer.as_slice().try_into().unwrap());
        assert_eq!(
            hex::encode(state.digest()),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }
}
