//! MCP (Model Context Protocol) server for Neo4j Aura
//!
//! Instance management is exposed through an Outcome Registry rather than
//! one tool per operation. Three fixed tools front the registry:
//! `list-outcomes`, `get-outcome-details` and `execute-outcome`.
//!
//! ## Binary Usage
//!
//! ```bash
//! # Stdio transport (for desktop MCP clients)
//! CLIENT_ID=... CLIENT_SECRET=... aura-mcp
//!
//! # HTTP transport with writes enabled
//! aura-mcp --transport http --port 8080 --read-only false
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use aura_core::{AuraClient, Config, InstanceApi};
//! use aura_mcp::{Dependencies, OutcomeRegistry, tools};
//!
//! # fn example(config: Config) -> anyhow::Result<()> {
//! let client: Arc<dyn InstanceApi> = Arc::new(AuraClient::from_config(&config)?);
//! let deps = Arc::new(Dependencies::new(
//!     Some(client),
//!     config,
//!     OutcomeRegistry::build()?,
//! ));
//! let router = tools::router(deps);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod outcome;
pub mod outcomes;
pub mod params;
pub mod registry;
pub mod state;
pub mod tools;

pub use error::OutcomeError;
pub use outcome::{Outcome, OutcomeHandler, OutcomeParameter, OutcomeSummary, OutcomeType};
pub use params::Parameters;
pub use registry::OutcomeRegistry;
pub use state::Dependencies;
