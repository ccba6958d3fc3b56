// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const SESSION_TOKEN_BYTES: usize = 32;

/// Session token from the OS RNG.
pub fn generate_session_token() -> String {
    generate_token(&mut OsRng, SESSION_TOKEN_BYTES)
}

/// `nbytes` random bytes as Base64 URL-safe without padding, usable in
/// cookies, paths and document ids without escaping.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}

/// SHA-256 of a token or password. Only digests are stored or compared.
pub fn digest(value: &str) -> [u8; 32] {
    let out = Sha256::digest(value.as_bytes());
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Compares two digests without short-circuiting on the first difference.
pub fn digests_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
