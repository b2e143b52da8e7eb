//! Per-attempt nonce generation.

use rand::Rng;
use rand::rngs::OsRng;

/// Characters a nonce is drawn from.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Shortest nonce generated when no length is pinned.
pub const MIN_NONCE_LEN: usize = 16;
/// Longest nonce generated when no length is pinned.
pub const MAX_NONCE_LEN: usize = 40;

/// Generate a fresh alphanumeric nonce from the OS random source.
///
/// The length is `length` when pinned, otherwise drawn uniformly from
/// `[MIN_NONCE_LEN, MAX_NONCE_LEN]`. A nonce is used for exactly one
/// verification attempt.
pub(crate) fn generate(length: Option<usize>) -> String {
    let mut rng = OsRng;
    let len = length.unwrap_or_else(|| rng.gen_range(MIN_NONCE_LEN..=MAX_NONCE_LEN));
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
