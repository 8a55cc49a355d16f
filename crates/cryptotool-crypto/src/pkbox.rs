//! Public-key box: X25519 key agreement + XChaCha20-Poly1305
//!
//! The AEAD key is `HKDF-SHA256(ikm = X25519(own_private, peer_public),
//! info = "cryptotool-box-v1")`. Both directions agree on it:
//! `X25519(a, B) == X25519(b, A)`, so sealing for B with a's private key
//! opens with A's public key and b's private key.
//!
//! Output uses the same `[nonce][ciphertext][tag]` framing as
//! [`crate::secretbox`].

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey, SymmetricKey};
use crate::nonce::generate_nonce;
use crate::secretbox::{check_len, open_framed, seal_framed};
use crate::KEY_SIZE;

const BOX_KDF_INFO: &[u8] = b"cryptotool-box-v1";

/// Seal `plaintext` for `recipient`, authenticated as the owner of `sender`.
pub fn box_seal(
    plaintext: &[u8],
    recipient: &PublicKey,
    sender: &PrivateKey,
) -> CryptoResult<Vec<u8>> {
    let key = box_key(sender, recipient).ok_or(CryptoError::InvalidPublicKey)?;
    let nonce = generate_nonce()?;
    seal_framed(key.as_bytes(), &nonce, plaintext)
}

/// Open a message sealed by the owner of `sender` for `recipient`.
///
/// Wrong key pairs, corrupted data and degenerate peer keys all surface as
/// [`CryptoError::Decryption`].
pub fn box_open(
    sealed: &[u8],
    sender: &PublicKey,
    recipient: &PrivateKey,
) -> CryptoResult<Vec<u8>> {
    check_len(sealed)?;
    let key = box_key(recipient, sender).ok_or(CryptoError::Decryption)?;
    open_framed(key.as_bytes(), sealed)
}

/// `None` when the exchange is non-contributory (low-order peer key).
fn box_key(own: &PrivateKey, peer: &PublicKey) -> Option<SymmetricKey> {
    let shared = own.diffie_hellman(peer);
    if !shared.was_contributory() {
        tracing::debug!("rejected non-contributory key exchange");
        return None;
    }

    let hkdf = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut okm = [0u8; KEY_SIZE];
    // 32 bytes is far below the HKDF-SHA256 output limit
    hkdf.expand(BOX_KDF_INFO, &mut okm).ok()?;
    Some(SymmetricKey::from_bytes(okm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;
    use crate::secretbox::open;
    use crate::{NONCE_SIZE, OVERHEAD};

    #[test]
    fn test_box_roundtrip() {
        let alice = generate_keypair().unwrap();
        let bob = generate_keypair().unwrap();
        let plaintext = b"this is a test";

        let sealed = box_seal(plaintext, &bob.public, &alice.private).unwrap();
        let opened = box_open(&sealed, &alice.public, &bob.private).unwrap();

        assert_eq!(&opened, plaintext);
        assert_eq!(sealed.len(), plaintext.len() + OVERHEAD);
    }

    #[test]
    fn test_box_to_self() {
        let alice = generate_keypair().unwrap();

        let sealed = box_seal(b"note to self", &alice.public, &alice.private).unwrap();
        let opened = box_open(&sealed, &alice.public, &alice.private).unwrap();

        assert_eq!(opened, b"note to self");
    }

    #[test]
    fn test_box_wrong_recipient() {
        let alice = generate_keypair().unwrap();
        let bob = generate_keypair().unwrap();
        let eve = generate_keypair().unwrap();

        let sealed = box_seal(b"for bob", &bob.public, &alice.private).unwrap();
        let result = box_open(&sealed, &alice.public, &eve.private);

        assert!(matches!(result, Err(CryptoError::Decryption)));
    }

    #[test]
    fn test_box_wrong_sender() {
        let alice = generate_keypair().unwrap();
        let bob = generate_keypair().unwrap();
        let eve = generate_keypair().unwrap();

        let sealed = box_seal(b"from alice", &bob.public, &alice.private).unwrap();
        let result = box_open(&sealed, &eve.public, &bob.private);

        assert!(matches!(result, Err(CryptoError::Decryption)));
    }

    #[test]
    fn test_box_tampered() {
        let alice = generate_keypair().unwrap();
        let bob = generate_keypair().unwrap();

        let mut sealed = box_seal(b"secret data", &bob.public, &alice.private).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x80;

        let result = box_open(&sealed, &alice.public, &bob.private);
        assert!(matches!(result, Err(CryptoError::Decryption)));
    }

    #[test]
    fn test_box_short_input_is_malformed() {
        let alice = generate_keypair().unwrap();
        let result = box_open(&[0u8; NONCE_SIZE], &alice.public, &alice.private);
        assert!(matches!(result, Err(CryptoError::MalformedInput { .. })));
    }

    #[test]
    fn test_box_low_order_key_rejected() {
        let alice = generate_keypair().unwrap();
        let identity = PublicKey::from_bytes([0u8; KEY_SIZE]);

        let sealed = box_seal(b"x", &identity, &alice.private);
        assert!(matches!(sealed, Err(CryptoError::InvalidPublicKey)));

        let result = box_open(&[0u8; 64], &identity, &alice.private);
        assert!(matches!(result, Err(CryptoError::Decryption)));
    }

    #[test]
    fn test_box_not_openable_as_secretbox_with_passphrase_key() {
        let alice = generate_keypair().unwrap();
        let bob = generate_keypair().unwrap();

        let sealed = box_seal(b"asymmetric", &bob.public, &alice.private).unwrap();
        let key = crate::kdf::derive_key_from_passphrase("asymmetric");

        assert!(matches!(open(&sealed, &key), Err(CryptoError::Decryption)));
    }
}
