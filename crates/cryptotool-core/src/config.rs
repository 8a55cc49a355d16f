use cryptotool_digest::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Default config location; `~` is expanded against `$HOME`.
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/cryptotool/config.toml";

/// Top-level configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptotoolConfig {
    pub log: LogConfig,
    pub hash: HashConfig,
    pub encrypt: EncryptConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level or `EnvFilter` directive (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Algorithm used when `hash` is run without `--algo`
    pub default_algorithm: HashAlgorithm,
    /// Glob patterns (matched against entry names) skipped when hashing a directory
    pub exclude_patterns: Vec<String>,
    /// Descend into dot-directories and hash dot-files
    pub follow_hidden: bool,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            default_algorithm: HashAlgorithm::Sha256,
            exclude_patterns: vec![".git".into()],
            follow_hidden: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptConfig {
    /// Suffix appended to the input path for sealed output (default: .enc)
    pub suffix: String,
    /// Passphrase entry/confirmation rounds before giving up (0 = unlimited)
    pub max_prompt_attempts: u32,
    /// Unix permission bits for files holding sealed data or private keys
    pub file_mode: u32,
}

impl Default for EncryptConfig {
    fn default() -> Self {
        Self {
            suffix: ".enc".into(),
            max_prompt_attempts: 0,
            file_mode: 0o600,
        }
    }
}

impl EncryptConfig {
    /// `None` means "ask until the operator aborts".
    pub fn prompt_limit(&self) -> Option<u32> {
        match self.max_prompt_attempts {
            0 => None,
            n => Some(n),
        }
    }
}

impl CryptotoolConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let path = expand_tilde(path);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| CoreError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|source| CoreError::ConfigParse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.encrypt.suffix.is_empty() {
            return Err(CoreError::Config(
                "encrypt.suffix must not be empty (output would overwrite the input)".into(),
            ));
        }
        if self.encrypt.file_mode > 0o777 {
            return Err(CoreError::Config(format!(
                "encrypt.file_mode {:o} is not a permission mode",
                self.encrypt.file_mode
            )));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Expand `~` in path to the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = CryptotoolConfig::load(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config, CryptotoolConfig::default());
    }

    #[test]
    fn defaults() {
        let config = CryptotoolConfig::default();
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, LogFormat::Text);
        assert_eq!(config.hash.default_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.encrypt.suffix, ".enc");
        assert_eq!(config.encrypt.prompt_limit(), None);
        assert_eq!(config.encrypt.file_mode, 0o600);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "[hash]\ndefault_algorithm = \"blake3\"\n\n[encrypt]\nmax_prompt_attempts = 3\n",
        )
        .unwrap();

        let config = CryptotoolConfig::load(&path).unwrap();
        assert_eq!(config.hash.default_algorithm, HashAlgorithm::Blake3);
        assert_eq!(config.hash.exclude_patterns, vec![".git".to_string()]);
        assert_eq!(config.encrypt.prompt_limit(), Some(3));
        assert_eq!(config.encrypt.suffix, ".enc");
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = CryptotoolConfig::default();
        config.log.format = LogFormat::Json;
        config.hash.follow_hidden = true;

        let text = config.to_toml_string().unwrap();
        let back: CryptotoolConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn parse_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[log\nlevel = ").unwrap();

        let err = CryptotoolConfig::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[hash]\ndefault_algorithm = \"crc32\"\n").unwrap();

        assert!(CryptotoolConfig::load(&path).is_err());
    }

    #[test]
    fn empty_suffix_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[encrypt]\nsuffix = \"\"\n").unwrap();

        let err = CryptotoolConfig::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("TEXT".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        let p = Path::new("/etc/cryptotool.toml");
        assert_eq!(expand_tilde(p), p.to_path_buf());
    }
}
