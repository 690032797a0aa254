use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use leadboard::cli::{
    AdminCommands, DEFAULT_SERVER_URL, LeadCommands, run_admin_init, run_admin_reset, run_leads,
};
use leadboard::config::{DEFAULT_DATABASE_URL, ServerConfig};
use leadboard::server::{AppState, create_router};
use leadboard::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "leadboard")]
#[command(about = "A lead-management server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Query a running server
    Leads {
        /// Base URL of the leadboard server
        #[arg(long, global = true, env = "LEADBOARD_URL", default_value = DEFAULT_SERVER_URL)]
        server: String,

        #[command(subcommand)]
        command: LeadCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, env = "PORT", default_value = "5000")]
        port: u16,

        /// SQLite database location
        #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,
    },
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    // Any failure up to the bind is fatal; nothing is served half-initialized.
    config.prepare_data_dir()?;
    let db_path = config.db_path()?;
    let store = Arc::new(SqliteStore::new(&db_path)?);
    store.initialize()?;
    info!("Opened lead database at {}", db_path.display());

    let state = Arc::new(AppState::new(store.clone()));
    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close()?;
    info!("Server stopped");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("leadboard=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { database_url } => run_admin_init(database_url)?,
            AdminCommands::Reset { database_url, yes } => run_admin_reset(database_url, yes)?,
        },
        Commands::Leads { server, command } => run_leads(&server, command)?,
        Commands::Serve {
            host,
            port,
            database_url,
        } => {
            let config = ServerConfig {
                host,
                port,
                database_url,
            };
            tokio::runtime::Runtime::new()?.block_on(run_serve(config))?;
        }
    }

    Ok(())
}
