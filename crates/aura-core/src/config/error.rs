//! Error types for configuration loading

use thiserror::Error;

/// Errors that stop the process before the server is built
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{setting} is required but was empty. Set the {env} environment variable or pass --{flag}")]
    MissingRequired {
        setting: &'static str,
        env: &'static str,
        flag: &'static str,
    },

    #[error("Invalid API URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
