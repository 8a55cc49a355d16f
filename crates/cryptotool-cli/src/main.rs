//! cryptotool: digests, authenticated encryption and small encoding helpers
//!
//! Commands:
//!   hash     [-a algo] [-f file | -d dir | -s string]   - hex digest (stdin by default)
//!   base64   [--decode] [-f file | -s string]           - base64 encode/decode
//!   convert  <value>                                    - bin/oct/dec/hex of an integer
//!   random   [--bytes N]                                - URL-safe random token
//!   encrypt  <file>                                     - passphrase seal to <file>.enc
//!   decrypt  <file>                                     - passphrase open to stdout
//!   keygen   [--out-dir dir] [--name name]              - X25519 key pair
//!   seal     <file> --to <pub> --from <key>             - key-pair seal
//!   open     <file> --from <pub> --to <key>             - key-pair open
//!   config show                                         - effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use cryptotool_core::config::{CryptotoolConfig, LogFormat, DEFAULT_CONFIG_PATH};
use cryptotool_crypto::{PassphraseReader, PrivateKey, PublicKey, TerminalPrompt};
use cryptotool_digest::{Alphabet, DirHashOptions, HashAlgorithm};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "cryptotool",
    version,
    about = "Digests, authenticated encryption and encoding helpers",
    long_about = "cryptotool: hash files, directories and strings; seal and open files \
                  with a passphrase or an X25519 key pair; base64 and integer conversion"
)]
struct Cli {
    /// Path to config.toml
    #[arg(long, short = 'c', env = "CRYPTOTOOL_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log level or filter directive (overrides config; RUST_LOG wins over both)
    #[arg(long, env = "CRYPTOTOOL_LOG")]
    log_level: Option<String>,

    /// Log format: text or json (overrides config)
    #[arg(long)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the hex digest of a file, directory, string or stdin
    ///
    /// Stdin input has one trailing newline removed, so `echo foo | cryptotool hash`
    /// matches `cryptotool hash -s foo`.
    Hash {
        /// md5, sha1, sha256, sha512 or blake3 (default from config)
        #[arg(long, short = 'a')]
        algo: Option<HashAlgorithm>,
        /// Hash a file
        #[arg(long, short = 'f', conflicts_with_all = ["dir", "string"])]
        file: Option<PathBuf>,
        /// Hash every file under a directory into one digest
        #[arg(long, short = 'd', conflicts_with = "string")]
        dir: Option<PathBuf>,
        /// Hash a string
        #[arg(long, short = 's')]
        string: Option<String>,
    },

    /// Base64-encode (or decode) a file, string or stdin
    Base64 {
        /// Decode instead of encode; decoded bytes go to stdout as-is
        #[arg(long)]
        decode: bool,
        /// Use the URL-safe alphabet (- and _ instead of + and /)
        #[arg(long)]
        url_safe: bool,
        /// Read input from a file
        #[arg(long, short = 'f', conflicts_with = "string")]
        file: Option<PathBuf>,
        /// Use a string as input
        #[arg(long, short = 's')]
        string: Option<String>,
    },

    /// Show an integer in binary, octal, decimal and hex
    ///
    /// Accepts decimal or 0x / 0o / 0b prefixed input, optionally signed.
    Convert {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Print a URL-safe base64 token of random bytes
    Random {
        /// Number of random bytes
        #[arg(long, default_value_t = cryptotool_digest::random::DEFAULT_RANDOM_BYTES)]
        bytes: usize,
    },

    /// Seal a file with a passphrase (asked twice, not echoed)
    Encrypt {
        file: PathBuf,
        /// Output path (default: <file> + configured suffix)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
        /// Read the passphrase from the first line of this file instead of the terminal
        #[arg(long, env = "CRYPTOTOOL_PASSPHRASE_FILE")]
        passphrase_file: Option<PathBuf>,
    },

    /// Open a passphrase-sealed file; plaintext goes to stdout
    Decrypt {
        file: PathBuf,
        /// Write plaintext here instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
        /// Read the passphrase from the first line of this file instead of the terminal
        #[arg(long, env = "CRYPTOTOOL_PASSPHRASE_FILE")]
        passphrase_file: Option<PathBuf>,
    },

    /// Generate an X25519 key pair
    ///
    /// Without --out-dir both keys are printed as hex. With it, <name>.pub and
    /// <name>.key are written (the private key with the configured file mode).
    Keygen {
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long, default_value = "cryptotool")]
        name: String,
    },

    /// Seal a file for a recipient's public key, authenticated by your private key
    Seal {
        file: PathBuf,
        /// Recipient public key file (hex)
        #[arg(long)]
        to: PathBuf,
        /// Sender private key file (hex)
        #[arg(long)]
        from: PathBuf,
        /// Output path (default: <file> + configured suffix)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Open a key-pair sealed file; plaintext goes to stdout
    Open {
        file: PathBuf,
        /// Sender public key file (hex)
        #[arg(long)]
        from: PathBuf,
        /// Recipient private key file (hex)
        #[arg(long)]
        to: PathBuf,
        /// Write plaintext here instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CryptotoolConfig::load(&cli.config)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    init_logging(level, cli.log_format.unwrap_or(config.log.format));
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match cli.command {
        Commands::Hash { algo, file, dir, string } => cmd_hash(
            &config,
            algo.unwrap_or(config.hash.default_algorithm),
            file.as_deref(),
            dir.as_deref(),
            string.as_deref(),
        ),
        Commands::Base64 { decode, url_safe, file, string } => {
            let alphabet = if url_safe { Alphabet::UrlSafe } else { Alphabet::Standard };
            cmd_base64(decode, alphabet, file.as_deref(), string.as_deref())
        }
        Commands::Convert { value } => cmd_convert(&value),
        Commands::Random { bytes } => cmd_random(bytes),
        Commands::Encrypt { file, out, passphrase_file } => {
            cmd_encrypt(&config, &file, out.as_deref(), passphrase_file.as_deref())
        }
        Commands::Decrypt { file, out, passphrase_file } => {
            cmd_decrypt(&config, &file, out.as_deref(), passphrase_file.as_deref())
        }
        Commands::Keygen { out_dir, name } => cmd_keygen(&config, out_dir.as_deref(), &name),
        Commands::Seal { file, to, from, out } => {
            cmd_seal(&config, &file, &to, &from, out.as_deref())
        }
        Commands::Open { file, from, to, out } => {
            cmd_open(&config, &file, &from, &to, out.as_deref())
        }
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to stderr; stdout carries digests and plaintext.
fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Input / output helpers ────────────────────────────────────────────────────

fn read_stdin() -> Result<Vec<u8>> {
    let mut data = Vec::new();
    std::io::stdin()
        .read_to_end(&mut data)
        .context("reading stdin")?;
    Ok(data)
}

/// Read a regular file, refusing directories.
fn read_input_file(path: &Path) -> Result<Vec<u8>> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.is_dir() {
        anyhow::bail!("{} is a directory; expected a file", path.display());
    }
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Write `data` to `path`, creating it with `mode` (unix) and tightening the
/// mode if the file already existed.
fn write_output_file(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(mode);
    }

    let mut file = opts
        .open(path)
        .with_context(|| format!("creating {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("setting permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.write_all(data)
        .with_context(|| format!("writing {}", path.display()))?;
    file.flush()
        .with_context(|| format!("flushing {}", path.display()))
}

/// Plaintext goes to `out` if given, raw to stdout otherwise.
fn emit_plaintext(input: &Path, out: Option<&Path>, plaintext: &[u8], mode: u32) -> Result<()> {
    match out {
        Some(path) => {
            ensure_distinct(input, path)?;
            write_output_file(path, plaintext, mode)?;
            eprintln!("wrote decrypted file: {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(plaintext).context("writing plaintext to stdout")?;
            stdout.flush().context("flushing stdout")
        }
    }
}

/// `<input><suffix>` unless an explicit output path was given.
fn sealed_output_path(config: &CryptotoolConfig, input: &Path, out: Option<&Path>) -> Result<PathBuf> {
    let path = match out {
        Some(p) => p.to_path_buf(),
        None => {
            let mut s = input.as_os_str().to_owned();
            s.push(&config.encrypt.suffix);
            PathBuf::from(s)
        }
    };
    ensure_distinct(input, &path)?;
    Ok(path)
}

/// Absolute form of `path` with symlinks resolved. An output that does not
/// exist yet resolves through its parent directory.
fn resolve_path(path: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = path.canonicalize() {
        return Some(resolved);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|p| p.join(name))
}

fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    let same = match (resolve_path(input), resolve_path(output)) {
        (Some(a), Some(b)) => a == b,
        _ => input == output,
    };
    if same {
        anyhow::bail!("output path {} would overwrite the input", output.display());
    }
    Ok(())
}

// ── `cryptotool hash` ─────────────────────────────────────────────────────────

fn cmd_hash(
    config: &CryptotoolConfig,
    algorithm: HashAlgorithm,
    file: Option<&Path>,
    dir: Option<&Path>,
    string: Option<&str>,
) -> Result<()> {
    let digest = if let Some(path) = file {
        cryptotool_digest::hash_file(algorithm, path)?
    } else if let Some(path) = dir {
        let options = DirHashOptions::new(
            config.hash.exclude_patterns.as_slice(),
            config.hash.follow_hidden,
        )?;
        cryptotool_digest::hash_dir(algorithm, path, &options)?
    } else if let Some(s) = string {
        cryptotool_digest::hash_bytes(algorithm, s.as_bytes())
    } else {
        let mut data = read_stdin()?;
        if data.last() == Some(&b'\n') {
            data.pop();
        }
        cryptotool_digest::hash_bytes(algorithm, &data)
    };

    println!("{}", hex::encode(digest));
    Ok(())
}

// ── `cryptotool base64` ───────────────────────────────────────────────────────

fn cmd_base64(
    decode: bool,
    alphabet: Alphabet,
    file: Option<&Path>,
    string: Option<&str>,
) -> Result<()> {
    let input = match (file, string) {
        (Some(path), _) => read_input_file(path)?,
        (None, Some(s)) => s.as_bytes().to_vec(),
        (None, None) => read_stdin()?,
    };

    if decode {
        let text = std::str::from_utf8(&input).context("base64 input is not UTF-8 text")?;
        let decoded = cryptotool_digest::decode_base64(text, alphabet)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&decoded).context("writing decoded bytes")?;
        stdout.flush().context("flushing stdout")
    } else {
        println!("{}", cryptotool_digest::encode_base64(&input, alphabet));
        Ok(())
    }
}

// ── `cryptotool convert` / `cryptotool random` ────────────────────────────────

fn cmd_convert(value: &str) -> Result<()> {
    let c = cryptotool_digest::convert_int(value)?;
    println!("BIN: {}", c.bin);
    println!("OCT: {}", c.oct);
    println!("DEC: {}", c.dec);
    println!("HEX: {}", c.hex);
    Ok(())
}

fn cmd_random(bytes: usize) -> Result<()> {
    println!("{}", cryptotool_digest::random_string(bytes)?);
    Ok(())
}

// ── Passphrase sources ────────────────────────────────────────────────────────

/// Non-interactive passphrase: the first line of a file, returned for every
/// prompt (so confirmation always matches).
struct PassphraseFile(SecretString);

impl PassphraseFile {
    fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading passphrase file {}", path.display()))?;
        let line = content.lines().next().unwrap_or_default();
        if line.is_empty() {
            anyhow::bail!("passphrase file {} has an empty first line", path.display());
        }
        Ok(Self(SecretString::from(line.to_string())))
    }
}

impl PassphraseReader for PassphraseFile {
    fn read_passphrase(&mut self, _prompt: &str) -> std::io::Result<SecretString> {
        Ok(SecretString::from(self.0.expose_secret().to_string()))
    }
}

fn passphrase_reader(passphrase_file: Option<&Path>) -> Result<Box<dyn PassphraseReader>> {
    Ok(match passphrase_file {
        Some(path) => Box::new(PassphraseFile::open(path)?),
        None => Box::new(TerminalPrompt),
    })
}

// ── `cryptotool encrypt` / `cryptotool decrypt` ───────────────────────────────

fn cmd_encrypt(
    config: &CryptotoolConfig,
    file: &Path,
    out: Option<&Path>,
    passphrase_file: Option<&Path>,
) -> Result<()> {
    let output = sealed_output_path(config, file, out)?;
    let plaintext = read_input_file(file)?;

    let mut reader = passphrase_reader(passphrase_file)?;
    let key = cryptotool_crypto::prompt_and_derive_key(
        reader.as_mut(),
        config.encrypt.prompt_limit(),
    )?;

    let sealed = cryptotool_crypto::seal(&plaintext, &key)
        .with_context(|| format!("encrypting {}", file.display()))?;
    write_output_file(&output, &sealed, config.encrypt.file_mode)?;

    tracing::info!(input = %file.display(), output = %output.display(), bytes = sealed.len(), "sealed file");
    eprintln!("created encrypted file: {}", output.display());
    Ok(())
}

fn cmd_decrypt(
    config: &CryptotoolConfig,
    file: &Path,
    out: Option<&Path>,
    passphrase_file: Option<&Path>,
) -> Result<()> {
    let sealed = read_input_file(file)?;

    let mut reader = passphrase_reader(passphrase_file)?;
    let key = cryptotool_crypto::prompt_key(reader.as_mut())?;

    let plaintext = cryptotool_crypto::open(&sealed, &key)
        .with_context(|| format!("decrypting {}", file.display()))?;
    tracing::info!(input = %file.display(), bytes = plaintext.len(), "opened file");

    emit_plaintext(file, out, &plaintext, config.encrypt.file_mode)
}

// ── `cryptotool keygen` / `seal` / `open` ─────────────────────────────────────

fn cmd_keygen(config: &CryptotoolConfig, out_dir: Option<&Path>, name: &str) -> Result<()> {
    let pair = cryptotool_crypto::generate_keypair()?;
    let private_hex = pair.private.to_hex();

    match out_dir {
        None => {
            println!("public:  {}", pair.public.to_hex());
            println!("private: {}", private_hex.expose_secret());
        }
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            let pub_path = dir.join(format!("{name}.pub"));
            let key_path = dir.join(format!("{name}.key"));

            write_output_file(&pub_path, format!("{}\n", pair.public.to_hex()).as_bytes(), 0o644)?;
            write_output_file(
                &key_path,
                format!("{}\n", private_hex.expose_secret()).as_bytes(),
                config.encrypt.file_mode,
            )?;

            println!("public key:  {}", pub_path.display());
            println!("private key: {}", key_path.display());
        }
    }
    Ok(())
}

fn load_public_key(path: &Path) -> Result<PublicKey> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading public key {}", path.display()))?;
    PublicKey::from_hex(&text).with_context(|| format!("parsing public key {}", path.display()))
}

fn load_private_key(path: &Path) -> Result<PrivateKey> {
    let text = SecretString::from(
        std::fs::read_to_string(path)
            .with_context(|| format!("reading private key {}", path.display()))?,
    );
    PrivateKey::from_hex(text.expose_secret())
        .with_context(|| format!("parsing private key {}", path.display()))
}

fn cmd_seal(
    config: &CryptotoolConfig,
    file: &Path,
    to: &Path,
    from: &Path,
    out: Option<&Path>,
) -> Result<()> {
    let output = sealed_output_path(config, file, out)?;
    let recipient = load_public_key(to)?;
    let sender = load_private_key(from)?;
    let plaintext = read_input_file(file)?;

    let sealed = cryptotool_crypto::box_seal(&plaintext, &recipient, &sender)
        .with_context(|| format!("sealing {}", file.display()))?;
    write_output_file(&output, &sealed, config.encrypt.file_mode)?;

    tracing::info!(input = %file.display(), output = %output.display(), bytes = sealed.len(), "box-sealed file");
    eprintln!("created sealed file: {}", output.display());
    Ok(())
}

fn cmd_open(
    config: &CryptotoolConfig,
    file: &Path,
    from: &Path,
    to: &Path,
    out: Option<&Path>,
) -> Result<()> {
    let sender = load_public_key(from)?;
    let recipient = load_private_key(to)?;
    let sealed = read_input_file(file)?;

    let plaintext = cryptotool_crypto::box_open(&sealed, &sender, &recipient)
        .with_context(|| format!("opening {}", file.display()))?;
    tracing::info!(input = %file.display(), bytes = plaintext.len(), "box-opened file");

    emit_plaintext(file, out, &plaintext, config.encrypt.file_mode)
}

// ── `cryptotool config show` ──────────────────────────────────────────────────

fn cmd_config_show(config: &CryptotoolConfig, config_path: &Path) -> Result<()> {
    let resolved = cryptotool_core::config::expand_tilde(config_path);
    if resolved.exists() {
        println!("# Configuration from: {}", resolved.display());
    } else {
        println!("# Configuration: defaults (no file at {})", resolved.display());
    }
    println!();
    print!("{}", config.to_toml_string()?);
    Ok(())
}
