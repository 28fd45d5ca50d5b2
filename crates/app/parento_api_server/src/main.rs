//! Parento API server binary.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use parento_core::auth::jwt::TokenService;
use parento_core::auth::revocation::RevocationList;
use tracing::info;

/// Interval between revocation-list sweeps.
const REVOCATION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "parento_api_server", about = "Parento API server")]
struct Args {
    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = parento_core::db::DEFAULT_MAX_CONNECTIONS)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,parento_api=debug,parento_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    // Missing/empty JWT_SECRET aborts startup here, before any listener
    // is bound.
    let config = parento_api::config::ApiConfig::from_env()?;

    info!(
        bind_addr = %config.bind_addr,
        max_connections = args.max_connections,
        "starting parento_api_server"
    );

    let pool =
        parento_core::db::connect_pool(&config.pg_connection_url, args.max_connections).await?;

    info!("running database migrations");
    parento_api::migrate(&pool).await?;

    let revocations = Arc::new(RevocationList::new());
    let tokens = Arc::new(TokenService::new(config.token_config(), revocations.clone())?);

    // Bound the revocation list's memory: sweep expired entries on a
    // fixed cadence.
    tokio::spawn({
        let revocations = revocations.clone();
        async move {
            let mut interval = tokio::time::interval(REVOCATION_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                revocations.cleanup();
            }
        }
    });

    let state = parento_api::AppState {
        pool,
        config: config.clone(),
        tokens,
    };

    let app = parento_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
