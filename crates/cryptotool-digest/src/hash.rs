//! Content digests for byte slices, files and directory trees
//!
//! A directory digest is the digest (same algorithm) of one line per regular
//! file, sorted by relative path:
//! ```text
//! <hex digest of file contents>  <relative/path/with/forward/slashes>\n
//! ```
//! so it changes when any file's contents, name or location changes, and does
//! not depend on the order the filesystem lists entries in.
//!
//! Names that are not UTF-8 or that contain a line break are refused rather
//! than skipped: either would let two different trees share one listing.

use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{DigestError, DigestResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Blake3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Digest length in bytes
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| {
                format!("unknown hash algorithm '{s}' (expected md5, sha1, sha256, sha512 or blake3)")
            })
    }
}

/// Incremental hasher over any supported algorithm.
enum Hasher {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Sha512(sha2::Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Hasher::Md5(md5::Md5::new()),
            HashAlgorithm::Sha1 => Hasher::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha256 => Hasher::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha512 => Hasher::Sha512(sha2::Sha512::new()),
            HashAlgorithm::Blake3 => Hasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(h) => h.update(data),
            Hasher::Sha1(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
            Hasher::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            Hasher::Md5(h) => h.finalize().to_vec(),
            Hasher::Sha1(h) => h.finalize().to_vec(),
            Hasher::Sha256(h) => h.finalize().to_vec(),
            Hasher::Sha512(h) => h.finalize().to_vec(),
            Hasher::Blake3(h) => h.finalize().as_bytes().to_vec(),
        }
    }
}

/// Hash a byte slice in memory.
pub fn hash_bytes(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}

/// Hash everything `reader` yields, 64KB at a time.
pub fn hash_reader<R: Read>(algorithm: HashAlgorithm, reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut hasher = Hasher::new(algorithm);
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize())
}

/// Hash a file from disk using the streaming interface.
pub fn hash_file(algorithm: HashAlgorithm, path: &Path) -> DigestResult<Vec<u8>> {
    let mut file = std::fs::File::open(path).map_err(|source| DigestError::Io {
        action: "opening file for hashing",
        path: path.to_path_buf(),
        source,
    })?;

    hash_reader(algorithm, &mut file).map_err(|source| DigestError::Io {
        action: "reading file for hashing",
        path: path.to_path_buf(),
        source,
    })
}

/// Which entries a directory digest covers.
#[derive(Debug, Clone, Default)]
pub struct DirHashOptions {
    excludes: Vec<glob::Pattern>,
    follow_hidden: bool,
}

impl DirHashOptions {
    /// `patterns` are globs matched against individual entry names.
    pub fn new<S: AsRef<str>>(patterns: &[S], follow_hidden: bool) -> DigestResult<Self> {
        let excludes = patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p.as_ref()).map_err(|source| DigestError::Pattern {
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<DigestResult<Vec<_>>>()?;
        Ok(Self {
            excludes,
            follow_hidden,
        })
    }

    fn skips(&self, name: &str) -> bool {
        (name.starts_with('.') && !self.follow_hidden)
            || self.excludes.iter().any(|p| p.matches(name))
    }
}

/// Hash every regular file under `root` into one digest.
///
/// Symlinks are not followed and contribute nothing.
pub fn hash_dir(
    algorithm: HashAlgorithm,
    root: &Path,
    options: &DirHashOptions,
) -> DigestResult<Vec<u8>> {
    let files = collect_files(root, options)?;
    tracing::debug!(root = %root.display(), files = files.len(), %algorithm, "hashing directory");

    let mut outer = Hasher::new(algorithm);
    for rel in &files {
        let digest = hash_file(algorithm, &root.join(rel))?;
        let line = format!("{}  {}\n", hex::encode(digest), relative_name(rel));
        outer.update(line.as_bytes());
    }
    Ok(outer.finalize())
}

/// Relative paths of all regular files under `root`, sorted.
pub fn collect_files(root: &Path, options: &DirHashOptions) -> DigestResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files_inner(root, Path::new(""), &mut files, options)?;
    files.sort_by_key(|p| relative_name(p));
    Ok(files)
}

fn collect_files_inner(
    root: &Path,
    rel: &Path,
    out: &mut Vec<PathBuf>,
    options: &DirHashOptions,
) -> DigestResult<()> {
    let dir = root.join(rel);
    let entries = std::fs::read_dir(&dir).map_err(|source| DigestError::Io {
        action: "reading dir",
        path: dir.clone(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| DigestError::Io {
            action: "reading dir entry in",
            path: dir.clone(),
            source,
        })?;
        let os_name = entry.file_name();
        if options.skips(&os_name.to_string_lossy()) {
            continue;
        }

        let meta = entry.metadata().map_err(|source| DigestError::Io {
            action: "stat",
            path: entry.path(),
            source,
        })?;
        if !meta.is_dir() && !meta.is_file() {
            continue;
        }
        let child = rel.join(listing_name(&os_name, &entry.path())?);
        if meta.is_dir() {
            collect_files_inner(root, &child, out, options)?;
        } else {
            out.push(child);
        }
    }
    Ok(())
}

/// The entry name as it will appear in the listing.
fn listing_name<'a>(name: &'a std::ffi::OsStr, path: &Path) -> DigestResult<&'a str> {
    let name = name.to_str().ok_or_else(|| DigestError::UnhashableName {
        path: path.to_path_buf(),
        reason: "name is not valid UTF-8",
    })?;
    if name.contains(['\n', '\r']) {
        return Err(DigestError::UnhashableName {
            path: path.to_path_buf(),
            reason: "name contains a line break",
        });
    }
    Ok(name)
}

/// Forward-slash form, so digests agree across platforms.
fn relative_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hex_of(algorithm: HashAlgorithm, data: &[u8]) -> String {
        hex::encode(hash_bytes(algorithm, data))
    }

    #[test]
    fn known_answers_abc() {
        assert_eq!(hex_of(HashAlgorithm::Md5, b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            hex_of(HashAlgorithm::Sha1, b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex_of(HashAlgorithm::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex_of(HashAlgorithm::Sha512, b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn known_answers_empty() {
        assert_eq!(hex_of(HashAlgorithm::Md5, b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            hex_of(HashAlgorithm::Blake3, b""),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn output_lengths() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(hash_bytes(algorithm, b"x").len(), algorithm.output_len());
        }
    }

    #[test]
    fn algorithm_from_str() {
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert!("crc32".parse::<HashAlgorithm>().is_err());
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<HashAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn relative_name_uses_forward_slashes() {
        let p = Path::new("a").join("b").join("c.txt");
        assert_eq!(relative_name(&p), "a/b/c.txt");
    }

    #[test]
    fn hidden_and_excluded_names() {
        let opts = DirHashOptions::new(&["*.tmp", "target"], false).unwrap();
        assert!(opts.skips(".env"));
        assert!(opts.skips("scratch.tmp"));
        assert!(opts.skips("target"));
        assert!(!opts.skips("main.rs"));

        let opts = DirHashOptions::new::<&str>(&[], true).unwrap();
        assert!(!opts.skips(".env"));
    }

    #[test]
    fn listing_name_rejects_line_breaks() {
        let path = Path::new("dir");
        assert_eq!(listing_name(std::ffi::OsStr::new("a.txt"), path).unwrap(), "a.txt");
        for bad in ["a\nb", "a\rb", "trailing\n"] {
            let err = listing_name(std::ffi::OsStr::new(bad), path).unwrap_err();
            assert!(matches!(err, DigestError::UnhashableName { .. }));
        }
    }

    #[test]
    fn invalid_pattern_is_error() {
        let err = DirHashOptions::new(&["[unclosed"], false).unwrap_err();
        assert!(matches!(err, DigestError::Pattern { .. }));
    }

    proptest! {
        #[test]
        fn streaming_matches_in_memory(
            data in proptest::collection::vec(any::<u8>(), 0..=100_000),
            idx in 0usize..5,
        ) {
            let algorithm = HashAlgorithm::ALL[idx];
            let streamed = hash_reader(algorithm, &mut data.as_slice()).unwrap();
            prop_assert_eq!(streamed, hash_bytes(algorithm, &data));
        }
    }
}
