//! # aura-core
//!
//! Shared building blocks for the Aura MCP server:
//!
//! - **Config** - process configuration from environment variables and CLI overrides
//! - **Client** - the [`InstanceApi`] capability and its HTTP implementation for the
//!   Neo4j Aura API
//! - **Templates** - reusable instance-creation presets loaded from a JSON file
//!
//! The MCP crate consumes these through fixed interfaces so the outcome
//! handlers can be exercised against stub clients in tests.

pub mod client;
pub mod config;
pub mod error;
pub mod templates;

pub use client::{
    AuraClient, CloudProvider, CreateInstanceRequest, CreatedInstance, DeletedInstance,
    InstanceApi, InstanceDetails, InstanceSummary, InstanceType,
};
pub use config::{Config, ConfigError, ConfigOverrides, LogFormat};
pub use error::{ApiError, Result};
pub use templates::{InstanceTemplate, TemplateError, TemplateStore};
