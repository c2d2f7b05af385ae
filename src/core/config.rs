//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.truenotion/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::Backend;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TrueNotionConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub echo: EchoConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub intro_reveal_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub kind: Option<Backend>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EchoConfig {
    pub word_delay_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_INTRO_REVEAL_DELAY_MS: u64 = 14_500;
pub const DEFAULT_ECHO_WORD_DELAY_MS: u64 = 40;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: Backend,
    pub base_url: String,
    pub request_timeout: Duration,
    pub intro_reveal_delay: Duration,
    pub echo_word_delay: Duration,
}

/// Values taken from CLI flags (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub backend: Option<Backend>,
    pub base_url: Option<&'a str>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.truenotion/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".truenotion").join("config.toml"))
}

/// Load config from `~/.truenotion/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TrueNotionConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TrueNotionConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TrueNotionConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<TrueNotionConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TrueNotionConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TrueNotionConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# TrueNotion Chat Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# intro_reveal_delay_ms = 14500      # When the "type your query" hint appears

# [backend]
# kind = "http"                      # "http" or "echo" (offline)
# base_url = "http://localhost:8000" # Or set TRUENOTION_BASE_URL env var
# timeout_secs = 120

# [echo]
# word_delay_ms = 40
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TrueNotionConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
fn resolve_with_env(
    config: &TrueNotionConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Backend: CLI → env → config → default
    let backend = cli
        .backend
        .or_else(|| env("TRUENOTION_BACKEND").and_then(|s| parse_backend(&s)))
        .or(config.backend.kind)
        .unwrap_or_default();

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .map(str::to_string)
        .or_else(|| env("TRUENOTION_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    ResolvedConfig {
        backend,
        base_url: base_url.trim_end_matches('/').to_string(),
        request_timeout: Duration::from_secs(
            config.backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        intro_reveal_delay: Duration::from_millis(
            config
                .general
                .intro_reveal_delay_ms
                .unwrap_or(DEFAULT_INTRO_REVEAL_DELAY_MS),
        ),
        echo_word_delay: Duration::from_millis(
            config.echo.word_delay_ms.unwrap_or(DEFAULT_ECHO_WORD_DELAY_MS),
        ),
    }
}

fn parse_backend(value: &str) -> Option<Backend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "http" => Some(Backend::Http),
        "echo" => Some(Backend::Echo),
        other => {
            warn!("Ignoring unknown TRUENOTION_BACKEND value: {}", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = TrueNotionConfig::default();
        assert!(config.backend.kind.is_none());
        assert!(config.general.intro_reveal_delay_ms.is_none());
    }

    #[test]
    fn test_template_is_valid_toml() {
        let config: TrueNotionConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(
            &TrueNotionConfig::default(),
            &CliOverrides::default(),
            no_env,
        );
        assert_eq!(resolved.backend, Backend::Http);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.request_timeout, Duration::from_secs(120));
        assert_eq!(resolved.intro_reveal_delay, Duration::from_millis(14_500));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let toml_str = r#"
[general]
intro_reveal_delay_ms = 500

[backend]
kind = "echo"
base_url = "http://10.0.0.2:9000/"
timeout_secs = 5

[echo]
word_delay_ms = 0
"#;
        let config: TrueNotionConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.backend, Backend::Echo);
        assert_eq!(resolved.base_url, "http://10.0.0.2:9000");
        assert_eq!(resolved.request_timeout, Duration::from_secs(5));
        assert_eq!(resolved.intro_reveal_delay, Duration::from_millis(500));
        assert_eq!(resolved.echo_word_delay, Duration::ZERO);
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = TrueNotionConfig {
            backend: BackendConfig {
                kind: Some(Backend::Http),
                base_url: Some("http://from-config".to_string()),
                timeout_secs: None,
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "TRUENOTION_BACKEND" => Some("echo".to_string()),
            "TRUENOTION_BASE_URL" => Some("http://from-env".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.backend, Backend::Echo);
        assert_eq!(resolved.base_url, "http://from-env");

        let cli = CliOverrides {
            backend: Some(Backend::Http),
            base_url: Some("http://from-cli"),
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.backend, Backend::Http);
        assert_eq!(resolved.base_url, "http://from-cli");
    }

    #[test]
    fn test_unknown_backend_env_is_ignored() {
        let env = |key: &str| (key == "TRUENOTION_BACKEND").then(|| "carrier-pigeon".to_string());
        let resolved = resolve_with_env(&TrueNotionConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.backend, Backend::Http);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("truenotion-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[backend\nkind = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_generates_template() {
        let dir = std::env::temp_dir().join(format!("truenotion-gen-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let config = load_config_from(&path).unwrap();
        assert!(config.backend.kind.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[backend]"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
