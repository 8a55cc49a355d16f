use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::error::{DigestError, DigestResult};

/// Default token size in bytes (256 bits)
pub const DEFAULT_RANDOM_BYTES: usize = 32;

/// `len` bytes from the OS random source, URL-safe base64 encoded.
pub fn random_string(len: usize) -> DigestResult<String> {
    let mut bytes = vec![0u8; len];
    OsRng.try_fill_bytes(&mut bytes).map_err(DigestError::Entropy)?;
    Ok(URL_SAFE.encode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_token_length() {
        // 32 bytes → 44 chars with padding
        let token = random_string(DEFAULT_RANDOM_BYTES).unwrap();
        assert_eq!(token.len(), 44);
        assert!(!token.contains('+') && !token.contains('/'));
    }

    #[test]
    fn tokens_differ() {
        assert_ne!(random_string(16).unwrap(), random_string(16).unwrap());
    }

    #[test]
    fn zero_length() {
        assert_eq!(random_string(0).unwrap(), "");
    }
}
