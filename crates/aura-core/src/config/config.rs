//! Configuration resolution for the Aura MCP server
//!
//! Handles configuration loading from environment variables and command-line
//! overrides. Invalid optional values fall back to defaults with a warning;
//! missing credentials are fatal.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use super::error::{ConfigError, Result};

/// Default Aura API base URL
pub const DEFAULT_API_URL: &str = "https://api.neo4j.io/v1";

/// Default location of the instance template file
pub const DEFAULT_INSTANCE_CONFIG_FILE: &str = "./instance_configs.json";

/// Log levels accepted by `LOG_LEVEL` / `--log-level`
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Environment variable names
pub mod env {
    pub const URI: &str = "URI";
    pub const CLIENT_ID: &str = "CLIENT_ID";
    pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
    pub const READ_ONLY: &str = "READ_ONLY";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    pub const INSTANCE_CONFIG_FILE: &str = "INSTANCE_CONFIG_FILE";
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Values supplied on the command line. `None` and empty strings mean "not set".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub uri: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub read_only: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub instance_config_file: Option<String>,
}

/// Immutable process configuration
#[derive(Clone)]
pub struct Config {
    /// Base URL of the Aura API
    pub api_url: String,
    /// OAuth client id used to obtain API tokens
    pub client_id: String,
    /// OAuth client secret used to obtain API tokens
    pub client_secret: String,
    /// Blocks every outcome not marked read-only
    pub read_only: bool,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Path of the JSON file holding instance templates
    pub instance_config_file: PathBuf,
    /// Non-fatal problems found while resolving settings, reported once logging is up
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            read_only: true,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            instance_config_file: PathBuf::from(DEFAULT_INSTANCE_CONFIG_FILE),
            warnings: Vec::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_credential(&self.client_secret))
            .field("read_only", &self.read_only)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("instance_config_file", &self.instance_config_file)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment with CLI overrides applied
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Resolve configuration from an arbitrary variable lookup.
    ///
    /// CLI overrides take precedence over looked-up values, which take
    /// precedence over defaults.
    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |cli: &Option<String>, key: &str| -> Option<String> {
            non_empty(cli.clone()).or_else(|| non_empty(lookup(key)))
        };

        let defaults = Config::default();
        let mut warnings = Vec::new();

        let api_url = resolve(&overrides.uri, env::URI).unwrap_or(defaults.api_url);
        let client_id = resolve(&overrides.client_id, env::CLIENT_ID).unwrap_or_default();
        let client_secret =
            resolve(&overrides.client_secret, env::CLIENT_SECRET).unwrap_or_default();

        let read_only = match resolve(&overrides.read_only, env::READ_ONLY) {
            None => defaults.read_only,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "invalid {} value '{}', using default: {}",
                    env::READ_ONLY,
                    raw,
                    defaults.read_only
                ));
                defaults.read_only
            }),
        };

        let log_level = match resolve(&overrides.log_level, env::LOG_LEVEL) {
            None => defaults.log_level,
            Some(raw) => {
                let level = raw.to_ascii_lowercase();
                if VALID_LOG_LEVELS.contains(&level.as_str()) {
                    level
                } else {
                    warnings.push(format!(
                        "invalid {} '{}', using default 'info'. Valid values: {:?}",
                        env::LOG_LEVEL,
                        raw,
                        VALID_LOG_LEVELS
                    ));
                    defaults.log_level
                }
            }
        };

        let log_format = match resolve(&overrides.log_format, env::LOG_FORMAT) {
            None => defaults.log_format,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warnings.push(format!(
                    "invalid {} '{}', using default 'text'. Valid values: [\"text\", \"json\"]",
                    env::LOG_FORMAT,
                    raw
                ));
                defaults.log_format
            }),
        };

        let instance_config_file = resolve(&overrides.instance_config_file, env::INSTANCE_CONFIG_FILE)
            .map(PathBuf::from)
            .unwrap_or(defaults.instance_config_file);

        if !instance_config_file.exists() {
            warnings.push(format!(
                "instance configuration file not found at '{}'",
                instance_config_file.display()
            ));
        }

        let config = Config {
            api_url,
            client_id,
            client_secret,
            read_only,
            log_level,
            log_format,
            instance_config_file,
            warnings,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that required settings are present and well formed
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                setting: "Aura API Client Id",
                env: env::CLIENT_ID,
                flag: "client-id",
            });
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                setting: "Aura API Client Secret",
                env: env::CLIENT_SECRET,
                flag: "client-secret",
            });
        }
        Url::parse(&self.api_url).map_err(|source| ConfigError::InvalidUrl {
            value: self.api_url.clone(),
            source,
        })?;
        Ok(())
    }
}

/// Parse a boolean the way the server's flags and environment accept it.
///
/// Accepts `1`, `t`, `T`, `true`, `True`, `TRUE` and the matching false forms.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Mask a credential value, showing only first/last chars
fn mask_credential(value: &str) -> String {
    if value.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}...{}", head, tail)
}
