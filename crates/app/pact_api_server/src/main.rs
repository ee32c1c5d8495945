//! Pact API server binary.
//!
//! Builds the PostgreSQL pool once, runs migrations, and serves the REST API
//! until interrupted.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use pact_api::config::{ApiConfig, GateMode};
use pact_core::store::{PgTokenStore, PgUserDirectory};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server. Unset flags fall back to `ApiConfig::from_env`.
#[derive(Parser, Debug)]
#[command(name = "pact_api_server", about = "Pact REST API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 10)]
    max_connections: u32,

    /// Skip embedded migrations on startup.
    #[arg(long, default_value_t = false)]
    skip_migrations: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a password from stdin and print its bcrypt hash at `BCRYPT_COST`.
    HashPassword,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so `hash-password` output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pact_api=debug,pact_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(url) = args.database_url {
        config.pg_connection_url = url;
    }

    if let Some(Command::HashPassword) = args.command {
        let mut password = String::new();
        std::io::stdin().read_line(&mut password)?;
        let password = password.trim_end_matches(['\r', '\n']);
        let hash = pact_core::auth::password::hash_password(password, config.bcrypt_cost)?;
        println!("{hash}");
        return Ok(());
    }

    info!(
        bind_addr = %config.bind_addr,
        environment = %config.environment,
        gate_mode = ?config.gate_mode,
        "starting pact_api_server"
    );
    if config.gate_mode == GateMode::Locked {
        warn!("access gate is locked: every route except /login and /health is refused");
    }

    info!(max_connections = args.max_connections, "configuring connection pool");
    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(config.store_timeout)
        .connect(&config.pg_connection_url)
        .await?;

    if !args.skip_migrations {
        info!("running database migrations");
        pact_core::migrate::migrate(&pool).await?;
    }

    let state = pact_api::AppState::new(
        config.clone(),
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(PgTokenStore::new(pool)),
    );
    let app = pact_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
