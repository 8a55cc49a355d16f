//! Symmetric seal/open with XChaCha20-Poly1305
//!
//! Sealed message format (binary):
//! ```text
//! [24 bytes: nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```
//!
//! The nonce travels with the ciphertext, so a sealed blob needs nothing but
//! the key to open. The framing helpers here are shared with [`crate::pkbox`].

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};

use crate::error::{CryptoError, CryptoResult};
use crate::keys::SymmetricKey;
use crate::nonce::{generate_nonce, Nonce};
use crate::{KEY_SIZE, MIN_SEALED_LEN, NONCE_SIZE};

/// Seal `plaintext` under `key` with a fresh random nonce.
///
/// Returns `[24-byte nonce][ciphertext][16-byte tag]`. Sealing the same
/// plaintext twice gives unrelated outputs.
pub fn seal(plaintext: &[u8], key: &SymmetricKey) -> CryptoResult<Vec<u8>> {
    let nonce = generate_nonce()?;
    seal_framed(key.as_bytes(), &nonce, plaintext)
}

/// Seal with a caller-chosen nonce. Deterministic; for test vectors only.
///
/// Reusing a nonce with the same key destroys confidentiality of both
/// messages and allows forgeries. Production paths call [`seal`].
pub fn seal_with_static_nonce(
    plaintext: &[u8],
    nonce: &Nonce,
    key: &SymmetricKey,
) -> CryptoResult<Vec<u8>> {
    seal_framed(key.as_bytes(), nonce, plaintext)
}

/// Open a message produced by [`seal`] or [`seal_with_static_nonce`].
///
/// Blobs shorter than nonce + tag fail with [`CryptoError::MalformedInput`]
/// without touching the cipher. Every authentication failure is
/// [`CryptoError::Decryption`].
pub fn open(sealed: &[u8], key: &SymmetricKey) -> CryptoResult<Vec<u8>> {
    open_framed(key.as_bytes(), sealed)
}

/// `nonce || AEAD(plaintext)` under a raw 256-bit key.
pub(crate) fn seal_framed(
    key: &[u8; KEY_SIZE],
    nonce: &Nonce,
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.into());

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(nonce.as_bytes());
    result.extend_from_slice(&ciphertext);

    tracing::debug!(
        plaintext_len = plaintext.len(),
        sealed_len = result.len(),
        "sealed message"
    );
    Ok(result)
}

/// Inverse of [`seal_framed`].
pub(crate) fn open_framed(key: &[u8; KEY_SIZE], sealed: &[u8]) -> CryptoResult<Vec<u8>> {
    check_len(sealed)?;

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
    let cipher = XChaCha20Poly1305::new(key.into());

    cipher
        .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::Decryption)
}

pub(crate) fn check_len(sealed: &[u8]) -> CryptoResult<()> {
    if sealed.len() < MIN_SEALED_LEN {
        return Err(CryptoError::MalformedInput {
            len: sealed.len(),
            min: MIN_SEALED_LEN,
        });
    }
    Ok(())
}
