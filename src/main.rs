//! fairway-gateway server entry point.
//!
//! Starts the Axum HTTP server for tournament registration and
//! sponsorship management.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fairway_gateway::api;
use fairway_gateway::app_state::AppState;
use fairway_gateway::config::RegistryConfig;
use fairway_gateway::domain::CodeGenerator;
use fairway_gateway::persistence::{self, PlayerStore, SponsorStore, TeamStore};
use fairway_gateway::service::{CreditLedger, EmailService, PlayerCache, RegistrationService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RegistryConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting fairway-gateway");

    // Connect and run migrations
    let pool = persistence::connect(&config).await?;

    // Build stores and services
    let players = PlayerStore::new(pool.clone());
    let teams = TeamStore::new(pool.clone());
    let sponsors = SponsorStore::new(pool.clone());
    let ledger = CreditLedger::new(pool.clone(), CodeGenerator::new(&config.code_prefix));
    let email = EmailService::new(&config);
    let registration = Arc::new(RegistrationService::new(
        players.clone(),
        teams.clone(),
        sponsors.clone(),
        ledger.clone(),
        email.clone(),
    ));
    let player_cache = Arc::new(PlayerCache::new(Duration::from_secs(
        config.player_cache_ttl_secs,
    )));

    // Build application state
    let app_state = AppState {
        config: Arc::new(config.clone()),
        admin_token: Arc::new(api::auth::mint_admin_token()),
        players,
        teams,
        sponsors,
        ledger,
        registration,
        email,
        player_cache,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
