use std::path::PathBuf;
use thiserror::Error;

pub type DigestResult<T> = Result<T, DigestError>;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A name the directory listing cannot represent unambiguously.
    #[error("cannot hash {}: {reason}", path.display())]
    UnhashableName { path: PathBuf, reason: &'static str },

    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid number '{input}': {reason}")]
    InvalidNumber { input: String, reason: String },

    #[error("secure random source unavailable: {0}")]
    Entropy(#[source] rand::Error),
}
