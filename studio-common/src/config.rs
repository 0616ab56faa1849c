//! Configuration loading and resolution
//!
//! Every setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed TOML file never terminates startup: a warning is
//! logged and the remaining tiers are used.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable names
pub const ENV_ROOT_FOLDER: &str = "STUDIO_ROOT_FOLDER";
pub const ENV_BIND: &str = "STUDIO_BIND";
pub const ENV_PORT: &str = "STUDIO_PORT";
pub const ENV_PRODUCTION: &str = "STUDIO_PRODUCTION";
pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "studio.db";

/// Compiled-in defaults used when no other tier provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub llm_max_tokens: u32,
    pub llm_timeout_secs: u64,
}

impl CompiledDefaults {
    /// Defaults for the platform the binary runs on
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("studio"))
            .unwrap_or_else(|| PathBuf::from("./studio_data"));

        Self {
            root_folder,
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            llm_model: "claude-3-5-sonnet-latest".to_string(),
            llm_base_url: "https://api.anthropic.com".to_string(),
            llm_max_tokens: 1024,
            llm_timeout_secs: 60,
        }
    }
}

/// `[llm]` table of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmToml {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub production: Option<bool>,
    #[serde(default)]
    pub llm: LlmToml,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load TOML from `path`, or from the platform default location.
    ///
    /// Missing or unreadable files degrade to an empty config with a warning.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => p,
            None => {
                warn!("Could not determine config directory, using defaults");
                return Self::default();
            }
        };

        if !path.exists() {
            warn!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("{} ({}), using defaults", e, path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Platform config file location: `<config_dir>/studio/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("studio").join("config.toml"))
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub production: bool,
}

/// Resolved LLM client settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
    pub static_dir: Option<PathBuf>,
    /// Enables `Secure` session cookies
    pub production: bool,
    pub llm: LlmConfig,
}

impl ServiceConfig {
    /// Merge all tiers into a single configuration
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder = cli
            .root_folder
            .clone()
            .or_else(|| env_var(ENV_ROOT_FOLDER).map(PathBuf::from))
            .or_else(|| toml.root_folder.clone())
            .unwrap_or(defaults.root_folder);

        let bind_address = cli
            .bind_address
            .clone()
            .or_else(|| env_var(ENV_BIND))
            .or_else(|| toml.bind_address.clone())
            .unwrap_or(defaults.bind_address);

        let port = cli
            .port
            .or_else(|| match env_var(ENV_PORT).map(|v| v.parse::<u16>()) {
                Some(Ok(port)) => Some(port),
                Some(Err(e)) => {
                    warn!("Ignoring invalid {}: {}", ENV_PORT, e);
                    None
                }
                None => None,
            })
            .or(toml.port)
            .unwrap_or(defaults.port);

        let production = cli.production
            || env_var(ENV_PRODUCTION).map(|v| parse_bool(&v)).unwrap_or(false)
            || toml.production.unwrap_or(false);

        let api_key = env_var(ENV_API_KEY)
            .filter(|k| is_valid_key(k))
            .or_else(|| toml.llm.api_key.clone().filter(|k| is_valid_key(k)));

        Self {
            root_folder,
            bind_address,
            port,
            log_level: toml.log_level.clone().unwrap_or(defaults.log_level),
            static_dir: cli.static_dir.clone().or_else(|| toml.static_dir.clone()),
            production,
            llm: LlmConfig {
                api_key,
                model: toml.llm.model.clone().unwrap_or(defaults.llm_model),
                base_url: toml.llm.base_url.clone().unwrap_or(defaults.llm_base_url),
                max_tokens: toml.llm.max_tokens.unwrap_or(defaults.llm_max_tokens),
                timeout_secs: toml.llm.timeout_secs.unwrap_or(defaults.llm_timeout_secs),
            },
        }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    /// `host:port` string for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Create the root folder if missing
    pub fn ensure_root_folder(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }
}

/// A key is usable when it contains something other than whitespace
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
