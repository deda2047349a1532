//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.travelbud/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::resolver::DEFAULT_GATEWAY_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TravelbudConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Display name used to personalize the welcome message. None = guest.
    pub user_name: Option<String>,
    /// "local" or "gateway".
    pub resolver: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub user_name: Option<String>,
    pub resolver: String,
    pub gateway_base_url: String,
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

/// Returns the path to `~/.travelbud/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".travelbud").join("config.toml"))
}

/// Load config from `~/.travelbud/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TravelbudConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TravelbudConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TravelbudConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(TravelbudConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: TravelbudConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# TravelBud Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# user_name = "Ada"          # Personalizes the welcome message; omit for guest mode
# resolver = "local"         # "local" (offline keyword rules) or "gateway" (HTTP agent)

# [gateway]
# base_url = "http://127.0.0.1:8000"   # Or set AGENT_GATEWAY_URL env var
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env → CLI.
///
/// `cli_resolver` and `cli_user` are from CLI flags (None = not specified).
pub fn resolve(
    config: &TravelbudConfig,
    cli_resolver: Option<&str>,
    cli_user: Option<&str>,
) -> ResolvedConfig {
    // Resolver: CLI → env → config → default
    let resolver = cli_resolver
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TRAVELBUD_RESOLVER").ok())
        .or_else(|| config.general.resolver.clone())
        .unwrap_or_else(|| "local".to_string());

    // User name: CLI → env → config (no default: absence means guest)
    let user_name = cli_user
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TRAVELBUD_USER").ok())
        .or_else(|| config.general.user_name.clone());

    // Gateway base URL: env → config → default
    let gateway_base_url = std::env::var("AGENT_GATEWAY_URL")
        .ok()
        .or_else(|| config.gateway.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GATEWAY_BASE_URL.to_string());

    ResolvedConfig {
        user_name,
        resolver,
        gateway_base_url,
    }
}
