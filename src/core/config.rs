//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.mira/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{DEFAULT_BASE_URL, RouteStyle};
use crate::core::identity::UsernameCache;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MiraConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: Option<String>,
    /// Keep the username in `~/.mira/user.json` between runs.
    pub remember_user: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub routes: Option<RouteStyle>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub routes: RouteStyle,
    pub log_level: LevelFilter,
    pub remember_user: bool,
    /// `None` only when there is no home directory. Resolved even with
    /// `remember_user` off so logout can still remove a stale file.
    pub username_cache: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn username_cache(&self) -> Option<UsernameCache> {
        self.username_cache.clone().map(UsernameCache::new)
    }
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

/// Returns `~/.mira`.
pub fn mira_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mira"))
}

/// Returns the path to `~/.mira/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    mira_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.mira/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MiraConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MiraConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MiraConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<MiraConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(MiraConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: MiraConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r#"# Mira Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"               # error, warn, info, debug, trace, off
# remember_user = true              # keep the username in ~/.mira/user.json

# [backend]
# base_url = "http://localhost:8000"  # Or set MIRA_BASE_URL env var
# routes = "flat"                     # "flat" (/check-user) or "prefixed" (/api/auth/check-user)
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.parse::<LevelFilter>() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Unknown log level '{}', using default", value);
            None
        }
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_base_url` and `cli_routes` are from CLI flags (None = not specified).
pub fn resolve(
    config: &MiraConfig,
    cli_base_url: Option<&str>,
    cli_routes: Option<RouteStyle>,
) -> ResolvedConfig {
    resolve_with_env(config, cli_base_url, cli_routes, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading env vars through `env`.
pub fn resolve_with_env(
    config: &MiraConfig,
    cli_base_url: Option<&str>,
    cli_routes: Option<RouteStyle>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| env("MIRA_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Routes: CLI → env → config → default
    let routes = cli_routes
        .or_else(|| {
            env("MIRA_ROUTES").and_then(|v| {
                let parsed = RouteStyle::parse(&v);
                if parsed.is_none() {
                    warn!("Ignoring MIRA_ROUTES='{}' (expected flat or prefixed)", v);
                }
                parsed
            })
        })
        .or(config.backend.routes)
        .unwrap_or_default();

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(parse_level)
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        base_url,
        routes,
        log_level,
        remember_user: config.general.remember_user.unwrap_or(true),
        username_cache: UsernameCache::default_path(),
    }
}
