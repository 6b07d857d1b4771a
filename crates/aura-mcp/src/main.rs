//! aura-mcp: MCP server for Neo4j Aura
//!
//! A standalone MCP server that exposes Aura instance management as
//! outcomes behind three tools.

use std::sync::Arc;

use anyhow::{Context, Result};
use aura_core::{AuraClient, Config, ConfigOverrides, InstanceApi, LogFormat};
use aura_mcp::{Dependencies, OutcomeRegistry, tools};
use clap::{Parser, ValueEnum};
use tower_mcp::{McpRouter, transport::StdioTransport};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Transport mode for the MCP server
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Transport {
    /// Standard input/output (for CLI integrations)
    #[default]
    Stdio,
    /// Streamable HTTP (for shared deployments)
    Http,
}

/// MCP server for Neo4j Aura instance management
///
/// Settings not given on the command line are read from the environment
/// (URI, CLIENT_ID, CLIENT_SECRET, READ_ONLY, LOG_LEVEL, LOG_FORMAT,
/// INSTANCE_CONFIG_FILE).
#[derive(Parser, Debug)]
#[command(name = "aura-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Transport mode
    #[arg(short, long, value_enum, default_value = "stdio")]
    transport: Transport,

    /// Aura API base URL
    #[arg(long)]
    uri: Option<String>,

    /// Aura API client id
    #[arg(long)]
    client_id: Option<String>,

    /// Aura API client secret
    #[arg(long)]
    client_secret: Option<String>,

    /// Read-only mode (enabled by default; use --read-only false to allow writes)
    #[arg(long)]
    read_only: Option<String>,

    /// Path of the instance configuration (template) file
    #[arg(long)]
    instance_config_file: Option<String>,

    // --- HTTP transport options ---
    /// Host to bind HTTP server
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind HTTP server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Maximum concurrent requests
    #[arg(long, default_value = "10")]
    max_concurrent: usize,

    /// Request timeout in seconds (HTTP mode)
    #[arg(long, default_value = "30")]
    request_timeout_secs: u64,

    // --- Logging ---
    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: text or json
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            uri: self.uri.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            read_only: self.read_only.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            instance_config_file: self.instance_config_file.clone(),
        }
    }
}

/// Initialize tracing on stderr; stdout belongs to the stdio transport
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.overrides()).context("Invalid configuration")?;
    init_tracing(&config);

    for warning in &config.warnings {
        warn!("{}", warning);
    }

    info!(
        transport = ?args.transport,
        api_url = %config.api_url,
        read_only = config.read_only,
        instance_config_file = %config.instance_config_file.display(),
        "Starting aura-mcp server"
    );

    // Outcomes report ClientUnavailable when this fails; the server still starts
    let client: Option<Arc<dyn InstanceApi>> = match AuraClient::from_config(&config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "Failed to create Aura API client");
            None
        }
    };

    let registry = OutcomeRegistry::build().context("Failed to build outcome registry")?;
    let read_only = config.read_only;
    let deps = Arc::new(Dependencies::new(client, config, registry));

    let router = build_router(deps, read_only);

    match args.transport {
        Transport::Stdio => {
            info!("Running with stdio transport");
            StdioTransport::new(router).run().await?;
        }
        Transport::Http => {
            info!(host = %args.host, port = args.port, "Running with HTTP transport");
            run_http_server(router, &args).await?;
        }
    }

    Ok(())
}

/// Build the MCP router with the outcome tools and instructions
fn build_router(deps: Arc<Dependencies>, read_only: bool) -> McpRouter {
    McpRouter::new()
        .server_info("aura-mcp", env!("CARGO_PKG_VERSION"))
        .merge(tools::router(deps))
        .instructions(&tools::instructions(read_only))
}

/// Run the HTTP server with middleware
async fn run_http_server(router: McpRouter, args: &Args) -> Result<()> {
    use std::time::Duration;
    use tower::limit::ConcurrencyLimitLayer;
    use tower::timeout::TimeoutLayer;
    use tower_mcp::HttpTransport;

    let addr = format!("{}:{}", args.host, args.port);

    HttpTransport::new(router)
        .layer(TimeoutLayer::new(Duration::from_secs(
            args.request_timeout_secs,
        )))
        .layer(ConcurrencyLimitLayer::new(args.max_concurrent))
        .serve(&addr)
        .await?;

    Ok(())
}
