//! Naver search MCP server - Main Entry Point
//!
//! stdout belongs to the JSON-RPC stream while serving; everything else goes
//! to stderr.

use clap::{Parser, Subcommand};
use naver_search_mcp::client::NaverClient;
use naver_search_mcp::config::ServerConfig;
use naver_search_mcp::dispatcher::Dispatcher;
use naver_search_mcp::lifecycle_span;
use naver_search_mcp::observability::{init_default_logging, HealthServer, MetricsCollector};
use naver_search_mcp::server::McpServer;
use naver_search_mcp::tools::tool_registry;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// MCP tool server for the Naver search and DataLab APIs
#[derive(Parser)]
#[command(name = "naver-search-mcp")]
#[command(about = "MCP tool server for the Naver search and DataLab APIs")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "NAVER_SEARCH_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Serve health and metrics over HTTP on this port
    #[arg(long, value_name = "PORT")]
    health_port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default)
    Serve,
    /// Print the tool registry as JSON
    Tools,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();
    install_panic_hook();

    let mut config = match ServerConfig::load(cli.config.as_deref()) {
        Ok((config, Some(path))) => {
            info!("Loaded configuration from: {}", path.display());
            config
        }
        Ok((config, None)) => {
            info!("No configuration file found, using defaults");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    if let Some(port) = cli.health_port {
        config.health.port = Some(port);
    }

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Tools => print_tools(),
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Log panics from any task instead of letting them vanish with the task
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!(panic = %panic_info, "Unhandled panic");
        default_hook(panic_info);
    }));
}

async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Starting {} v{}",
        config.server.name,
        env!("CARGO_PKG_VERSION")
    );

    let startup = lifecycle_span!(event = "startup").entered();

    // Credentials are the one fatal startup condition
    let credentials = match config.resolve_credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Missing credentials: {}", e);
            eprintln!(
                "{e}. Set {} and {} before starting the server.",
                config.naver.client_id_env, config.naver.client_secret_env
            );
            process::exit(1);
        }
    };

    let client = NaverClient::new(config.naver_config(credentials))?;
    let metrics = Arc::new(MetricsCollector::new());
    let dispatcher = Dispatcher::with_metrics(Arc::new(client), metrics.clone())?;
    let server = Arc::new(McpServer::with_name(
        Arc::new(dispatcher),
        config.server.name.clone(),
    ));

    let health_server = config.health.socket_addr().map(|addr| {
        let health_server = Arc::new(HealthServer::new(
            config.server.name.clone(),
            addr,
            metrics.clone(),
        ));
        let task_server = health_server.clone();
        tokio::spawn(async move {
            if let Err(e) = task_server.start().await {
                error!("Health server error: {}", e);
            }
        });
        health_server
    });

    if let Some(health_server) = &health_server {
        health_server.set_serving(true);
    }
    drop(startup);

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    let outcome: Result<(), Box<dyn std::error::Error>> = tokio::select! {
        result = server.run_stdio() => {
            info!("Input closed, shutting down");
            result.map_err(Into::into)
        }
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down");
            Ok(())
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
            Ok(())
        }
    };

    if let Some(health_server) = &health_server {
        health_server.set_serving(false);
    }

    let _shutdown = lifecycle_span!(event = "shutdown").entered();
    let snapshot = metrics.get_metrics();
    info!(
        invocations = snapshot.invocations.received,
        failed = snapshot.invocations.failed,
        "Shutdown complete"
    );

    outcome
}

fn print_tools() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(tool_registry())?);
    Ok(())
}

fn handle_config_command(
    config: &ServerConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    match config.resolve_credentials() {
        Ok(_) => info!("Credentials found in environment"),
        Err(e) => warn!("{}", e),
    }

    info!("Configuration validation complete");
    Ok(())
}
