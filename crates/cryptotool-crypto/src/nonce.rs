//! Random 192-bit nonces from the OS random source

use rand::{rngs::OsRng, RngCore};

use crate::error::{CryptoError, CryptoResult};
use crate::NONCE_SIZE;

/// A 24-byte XChaCha20-Poly1305 nonce.
///
/// Must be used at most once per key. [`generate_nonce`] is the only
/// constructor production code should need; [`Nonce::from_bytes`] exists for
/// parsing sealed messages and for the fixed-nonce test entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// Fill a fresh nonce from the OS random source.
///
/// Returns [`CryptoError::Entropy`] rather than a partially filled nonce if
/// the source cannot supply all 24 bytes.
pub fn generate_nonce() -> CryptoResult<Nonce> {
    let mut bytes = [0u8; NONCE_SIZE];
    fill_random(&mut bytes)?;
    Ok(Nonce(bytes))
}

/// Fill `buf` entirely from `OsRng`, or fail.
pub(crate) fn fill_random(buf: &mut [u8]) -> CryptoResult<()> {
    OsRng.try_fill_bytes(buf).map_err(CryptoError::Entropy)
}
