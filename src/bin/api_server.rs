// API Server Binary Entry Point
//
// Purpose: Serve creature cards and assessments over HTTP
// Usage: cargo run --features api --bin api_server

use cracker_calc::{create_router, AppState, CalcConfig, RuleChain};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "cracker_calc=info,api_server=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables. Invalid values are fatal here.
    let config = CalcConfig::from_env()?;

    // Optional custom rule table (JSON array of rules)
    let chain = match std::env::var("RULES_FILE").ok().map(PathBuf::from) {
        Some(path) => {
            tracing::info!("Loading rules from {:?}", path);
            RuleChain::load(&path)?
        }
        None => RuleChain::standard(),
    };

    tracing::info!("Configuration:");
    tracing::info!("  POKEAPI_BASE_URL: {}", config.api_base_url);
    tracing::info!("  CRACKER_WEIGHT_G: {}", config.cracker_weight_g);
    tracing::info!("  MAX_CREATURE_ID: {}", config.max_creature_id);
    tracing::info!("  RULES: {}", chain.rules().len());
    tracing::info!("  PORT: {}", config.port);

    let port = config.port;
    let state = AppState::new(config, chain)?;

    // Create router with all endpoints and middleware
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
