//! `cenvars` binary entry point.
//!
//! Fetches the payload for the configured key token, generates new tokens
//! and encrypts payloads for publishing.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cenvars::{
    CenvarsClient, CenvarsConfig, ConfigSource, EnvConfigSource, KeyToken, KeyTokenService,
    OsRngKeyPairGenerator, Payload, ProgressSink, RsaChunkedCipher,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// cenvars CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "cenvars")]
#[command(about = "Central environment variables - fetch and publish encrypted settings")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and decrypt the payload for the configured key token.
    Get {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Generate a new key token.
    Newkey {
        /// URL the encrypted payload will be served from (defaults to the URL variable).
        #[arg(short, long)]
        url: Option<String>,

        /// RSA modulus size in bits (defaults to the configured size).
        #[arg(short, long)]
        key_size: Option<usize>,
    },
    /// Encrypt a JSON object file for the configured key token.
    Encrypt {
        /// JSON object to encrypt.
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the encrypted blob (stdout when omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show URL, key size and identity of the configured key token.
    Inspect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON object.
    Json,
    /// `export NAME='value'` lines.
    Shell,
}

/// Prints progress lines on stderr so stdout stays machine-readable.
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => CenvarsConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CenvarsConfig::default(),
    };
    let source = EnvConfigSource::with_dotenv();

    match args.command {
        Command::Get { format } => get(config, &source, format),
        Command::Newkey { url, key_size } => newkey(&config, &source, url, key_size),
        Command::Encrypt { input, output } => encrypt(&config, &source, input, output),
        Command::Inspect => inspect(&config, &source),
    }
}

fn key_service() -> KeyTokenService<OsRngKeyPairGenerator, RsaChunkedCipher> {
    KeyTokenService::new(OsRngKeyPairGenerator, RsaChunkedCipher)
}

fn get(config: CenvarsConfig, source: &dyn ConfigSource, format: OutputFormat) -> Result<()> {
    let client = CenvarsClient::from_config(config);
    let payload = client.get_from_source(source, Some(&StderrProgress))?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&payload)?,
        OutputFormat::Shell => to_shell_exports(&payload)?,
    };
    println!("{rendered}");
    Ok(())
}

fn newkey(
    config: &CenvarsConfig,
    source: &dyn ConfigSource,
    url: Option<String>,
    key_size: Option<usize>,
) -> Result<()> {
    let url = match url {
        Some(url) => url,
        None => config.url_from(source)?,
    };
    let key_size = key_size.unwrap_or(config.default_key_size);

    let token = key_service().encode(&url, key_size, Some(&StderrProgress))?;
    eprintln!("Store this value in {}:", config.key_variable);
    println!("{token}");
    Ok(())
}

fn encrypt(
    config: &CenvarsConfig,
    source: &dyn ConfigSource,
    input: PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    let token = config.token_from(source)?;
    let raw = fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let payload: Payload = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not a JSON object", input.display()))?;

    let blob = key_service().encrypt_for_token(&token, &payload)?;
    match output {
        Some(path) => {
            fs::write(&path, blob.as_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(bytes = blob.len(), path = %path.display(), "wrote encrypted payload");
        }
        None => io::stdout().lock().write_all(blob.as_bytes())?,
    }
    Ok(())
}

fn inspect(config: &CenvarsConfig, source: &dyn ConfigSource) -> Result<()> {
    let token = KeyToken::decode(&config.token_from(source)?)?;
    println!("url:      {}", token.url());
    println!("key size: {}", token.key_size());
    println!("identity: {}", token.identity());
    Ok(())
}

/// Renders top-level entries as POSIX shell exports. Non-string values are
/// exported as their JSON text.
fn to_shell_exports(payload: &Payload) -> Result<String> {
    let mut lines = Vec::with_capacity(payload.len());
    for (name, value) in payload {
        if name.is_empty()
            || name.starts_with(|c: char| c.is_ascii_digit())
            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("{name:?} is not a valid shell variable name");
        }
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        lines.push(format!("export {name}='{}'", text.replace('\'', r"'\''")));
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn shell_exports_quote_values() {
        let rendered = to_shell_exports(&payload(json!({
            "A": "plain",
            "B": "it's",
            "C": 42,
            "D": {"x": [1]}
        })))
        .unwrap();
        assert_eq!(
            rendered,
            "export A='plain'\nexport B='it'\\''s'\nexport C='42'\nexport D='{\"x\":[1]}'"
        );
    }

    #[test]
    fn shell_exports_reject_bad_names() {
        assert!(to_shell_exports(&payload(json!({"1ABC": "x"}))).is_err());
        assert!(to_shell_exports(&payload(json!({"A-B": "x"}))).is_err());
        assert!(to_shell_exports(&payload(json!({"": "x"}))).is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let args = Args::try_parse_from(["cenvars", "newkey", "--url", "http://x", "-k", "512"])
            .unwrap();
        match args.command {
            Command::Newkey { url, key_size } => {
                assert_eq!(url.as_deref(), Some("http://x"));
                assert_eq!(key_size, Some(512));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let args = Args::try_parse_from(["cenvars", "get", "--format", "shell"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Get {
                format: OutputFormat::Shell
            }
        ));
    }

    #[test]
    fn newkey_without_url_is_configuration_error() {
        let source = cenvars::MapConfigSource::new();
        let err = newkey(&CenvarsConfig::default(), &source, None, Some(512)).unwrap_err();
        let err = err.downcast::<cenvars::CenvarsError>().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn get_without_token_is_configuration_error() {
        let source = cenvars::MapConfigSource::new();
        let err = get(CenvarsConfig::default(), &source, OutputFormat::Json).unwrap_err();
        let err = err.downcast::<cenvars::CenvarsError>().unwrap();
        assert!(err.is_configuration());
    }
}
