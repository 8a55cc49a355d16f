//! Key material: symmetric keys and X25519 key pairs

use secrecy::SecretString;
use x25519_dalek::{SharedSecret, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{CryptoError, CryptoResult};
use crate::nonce::fill_random;
use crate::KEY_SIZE;

/// A 256-bit symmetric key. Zeroized on drop.
#[derive(Clone)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// An X25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(x25519_dalek::PublicKey);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(x25519_dalek::PublicKey::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        self.0.as_bytes()
    }

    /// Lowercase hex, 64 chars.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Parse 64 hex chars. Surrounding whitespace (e.g. a trailing newline
    /// from a key file) is ignored.
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes = decode_key_hex("public key", s)?;
        Ok(Self::from_bytes(*bytes))
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

/// An X25519 private key. The inner secret zeroizes itself on drop.
#[derive(Clone)]
pub struct PrivateKey(StaticSecret);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(x25519_dalek::PublicKey::from(&self.0))
    }

    pub fn to_hex(&self) -> SecretString {
        let bytes = Zeroizing::new(self.0.to_bytes());
        SecretString::from(hex::encode(bytes.as_ref()))
    }

    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes = decode_key_hex("private key", s)?;
        Ok(Self::from_bytes(*bytes))
    }

    pub(crate) fn diffie_hellman(&self, peer: &PublicKey) -> SharedSecret {
        self.0.diffie_hellman(&peer.0)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").field(&"[REDACTED]").finish()
    }
}

/// A matching (public, private) X25519 pair.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    pub fn from_private(private: PrivateKey) -> Self {
        Self {
            public: private.public_key(),
            private,
        }
    }
}

/// Generate a random 256-bit symmetric key.
pub fn generate_key() -> CryptoResult<SymmetricKey> {
    let mut bytes = [0u8; KEY_SIZE];
    fill_random(&mut bytes)?;
    Ok(SymmetricKey::from_bytes(bytes))
}

/// Generate a fresh X25519 key pair from the OS random source.
pub fn generate_keypair() -> CryptoResult<KeyPair> {
    let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
    fill_random(bytes.as_mut())?;
    Ok(KeyPair::from_private(PrivateKey::from_bytes(*bytes)))
}

fn decode_key_hex(what: &'static str, s: &str) -> CryptoResult<Zeroizing<[u8; KEY_SIZE]>> {
    let mut bytes = Zeroizing::new([0u8; KEY_SIZE]);
    hex::decode_to_slice(s.trim(), bytes.as_mut()).map_err(|e| CryptoError::KeyEncoding {
        what,
        reason: e.to_string(),
    })?;
    Ok(bytes)
}
