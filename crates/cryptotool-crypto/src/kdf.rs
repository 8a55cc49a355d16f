//! Passphrase → symmetric key, and the masked double-entry prompt
//!
//! The derivation is a single unsalted SHA-256: identical passphrases always
//! give identical keys. It is a convenience for interactive use and offers
//! no brute-force resistance.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, CryptoResult};
use crate::keys::SymmetricKey;
use crate::KEY_SIZE;

const ENTER_PROMPT: &str = "enter password: ";
const REPEAT_PROMPT: &str = "repeat password: ";

/// Derive a 256-bit key from the UTF-8 bytes of `passphrase`.
pub fn derive_key_from_passphrase(passphrase: &str) -> SymmetricKey {
    let digest = Sha256::digest(passphrase.as_bytes());
    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&digest[..KEY_SIZE]);
    SymmetricKey::from_bytes(bytes)
}

/// Source of masked passphrase entries.
///
/// The terminal implementation is [`TerminalPrompt`]; tests script one.
pub trait PassphraseReader {
    /// Read one passphrase line without echoing it.
    fn read_passphrase(&mut self, prompt: &str) -> std::io::Result<SecretString>;

    /// Called when the confirmation entry did not match. Default: nothing.
    fn on_mismatch(&mut self) {}
}

/// Reads passphrases from the controlling terminal with echo disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PassphraseReader for TerminalPrompt {
    fn read_passphrase(&mut self, prompt: &str) -> std::io::Result<SecretString> {
        rpassword::prompt_password(prompt).map(SecretString::from)
    }

    fn on_mismatch(&mut self) {
        eprintln!("passwords don't match! please try again");
    }
}

/// Ask for a passphrase twice and derive a key once both entries match.
///
/// A mismatch re-prompts; it is not an error. `max_attempts` bounds the
/// number of entry/confirmation rounds (`None` keeps asking until the
/// operator aborts the process). Exhausting the bound yields
/// [`CryptoError::PromptAborted`]; a reader failure yields
/// [`CryptoError::Prompt`] immediately.
pub fn prompt_and_derive_key<R>(
    reader: &mut R,
    max_attempts: Option<u32>,
) -> CryptoResult<SymmetricKey>
where
    R: PassphraseReader + ?Sized,
{
    let mut attempts: u32 = 0;
    loop {
        if let Some(max) = max_attempts {
            if attempts >= max {
                return Err(CryptoError::PromptAborted { attempts });
            }
        }
        attempts = attempts.saturating_add(1);

        let entry = reader.read_passphrase(ENTER_PROMPT)?;
        let repeat = reader.read_passphrase(REPEAT_PROMPT)?;

        if entry.expose_secret() == repeat.expose_secret() {
            tracing::debug!(attempts, "passphrase confirmed");
            return Ok(derive_key_from_passphrase(entry.expose_secret()));
        }

        tracing::debug!(attempts, "passphrase confirmation mismatch");
        reader.on_mismatch();
    }
}

/// Ask for a passphrase once and derive a key from it.
///
/// Meant for opening: a mistyped passphrase fails authentication anyway, so
/// confirmation adds nothing there.
pub fn prompt_key<R>(reader: &mut R) -> CryptoResult<SymmetricKey>
where
    R: PassphraseReader + ?Sized,
{
    let entry = reader.read_passphrase(ENTER_PROMPT)?;
    Ok(derive_key_from_passphrase(entry.expose_secret()))
}
