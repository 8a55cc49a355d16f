//! cryptotool-digest: hashing and small encoding utilities
//!
//! - `hash`: MD5 / SHA-1 / SHA-256 / SHA-512 / BLAKE3 over byte slices,
//!   readers, files and whole directory trees
//! - `encoding`: base64 in the standard and URL-safe alphabets
//! - `convert`: integer → binary / octal / decimal / hex
//! - `random`: URL-safe random tokens

pub mod convert;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod random;

pub use convert::{convert_int, Conversions};
pub use encoding::{decode_base64, encode_base64, Alphabet};
pub use error::{DigestError, DigestResult};
pub use hash::{hash_bytes, hash_dir, hash_file, hash_reader, DirHashOptions, HashAlgorithm};
pub use random::random_string;
