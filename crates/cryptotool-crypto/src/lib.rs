//! cryptotool-crypto: authenticated encryption for the cryptotool CLI
//!
//! Two layers:
//! - Nonce/key provider: random nonces, symmetric keys and X25519 key pairs
//!   from the OS random source, plus passphrase → key derivation.
//! - Cipher layer: symmetric seal/open (XChaCha20-Poly1305) and asymmetric
//!   seal/open (X25519 + HKDF-SHA256 + XChaCha20-Poly1305).
//!
//! Sealed message format (binary), shared by both layers:
//! ```text
//! [24 bytes: nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```
//!
//! The key and cipher modules never print, persist or retry: every operation
//! returns a result or one [`CryptoError`]. The only terminal I/O lives in
//! [`TerminalPrompt`].

pub mod error;
pub mod kdf;
pub mod keys;
pub mod nonce;
pub mod pkbox;
pub mod secretbox;

pub use error::{CryptoError, CryptoResult};
pub use kdf::{
    derive_key_from_passphrase, prompt_and_derive_key, prompt_key, PassphraseReader,
    TerminalPrompt,
};
pub use keys::{generate_key, generate_keypair, KeyPair, PrivateKey, PublicKey, SymmetricKey};
pub use nonce::{generate_nonce, Nonce};
pub use pkbox::{box_open, box_seal};
pub use secretbox::{open, seal, seal_with_static_nonce};

/// Size of a symmetric key, public key or private key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Bytes a sealed message adds on top of its plaintext.
pub const OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

/// Shortest blob that can possibly be a sealed message (empty plaintext).
pub const MIN_SEALED_LEN: usize = OVERHEAD;
