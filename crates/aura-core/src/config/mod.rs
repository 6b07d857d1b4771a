#![allow(clippy::module_inception)]
//! Process configuration for the Aura MCP server
//!
//! Settings are resolved once at startup from three layers, highest priority
//! first: command-line overrides, environment variables, built-in defaults.
//! The resulting [`Config`] is immutable and shared by reference.

pub mod config;
pub mod error;

pub use config::{Config, ConfigOverrides, LogFormat, parse_bool};
pub use error::{ConfigError, Result};
