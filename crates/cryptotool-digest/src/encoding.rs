//! Base64 in the standard and URL-safe alphabets (both padded)

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine as _,
};

use crate::error::DigestResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alphabet {
    #[default]
    Standard,
    UrlSafe,
}

pub fn encode_base64(data: &[u8], alphabet: Alphabet) -> String {
    match alphabet {
        Alphabet::Standard => STANDARD.encode(data),
        Alphabet::UrlSafe => URL_SAFE.encode(data),
    }
}

/// Decode base64 text. Leading/trailing whitespace (a trailing newline from
/// a pipe, typically) is ignored.
pub fn decode_base64(text: &str, alphabet: Alphabet) -> DigestResult<Vec<u8>> {
    let text = text.trim();
    let decoded = match alphabet {
        Alphabet::Standard => STANDARD.decode(text)?,
        Alphabet::UrlSafe => URL_SAFE.decode(text)?,
    };
    Ok(decoded)
}
