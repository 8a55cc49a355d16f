use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// The OS random source could not supply the requested bytes.
    #[error("secure random source unavailable: {0}")]
    Entropy(#[source] rand::Error),

    /// Sealed blob is shorter than nonce + tag; never handed to the AEAD.
    #[error("malformed sealed message: {len} bytes (minimum {min})")]
    MalformedInput { len: usize, min: usize },

    /// Authentication failed. Wrong key, wrong key pair and corrupted data
    /// are deliberately indistinguishable.
    #[error("decryption failed: wrong key or corrupted data")]
    Decryption,

    /// Plaintext exceeds what the AEAD can seal under a single nonce.
    #[error("encryption failed: plaintext too large")]
    Encryption,

    /// Recipient public key is a low-order point; the shared secret would be
    /// predictable.
    #[error("invalid public key: non-contributory key exchange")]
    InvalidPublicKey,

    #[error("invalid {what} encoding: {reason}")]
    KeyEncoding { what: &'static str, reason: String },

    #[error("passphrase prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("passphrase not confirmed after {attempts} attempts")]
    PromptAborted { attempts: u32 },
}
