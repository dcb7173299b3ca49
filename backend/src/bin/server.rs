//! Study planner HTTP server binary.
//!
//! Initializes the repository, the credential verifier and the text
//! generator, then serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # Local (in-memory) repository with static development tokens
//! AUTH_STATIC_TOKENS="dev-token=7f1f6c1e-4c7c-4c55-9f3a-0d3c8e0c2a11:coach" \
//! LLM_API_URL=http://localhost:8000/v1 \
//!   cargo run --bin study-server
//!
//! # Hosted backend
//! REPOSITORY_TYPE=rest BACKEND_URL=https://project.example.co BACKEND_SERVICE_KEY=... \
//! AUTH_URL=https://project.example.co AUTH_API_KEY=... LLM_API_URL=... LLM_API_KEY=... \
//!   cargo run --bin study-server --features rest-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)
//! - `REPOSITORY_TYPE`, `BACKEND_*`: Repository selection, see `db::factory`
//! - `AUTH_*`: Credential verification, see `auth::AuthConfig`
//! - `LLM_*`: Text generator, see `generation::GenerationConfig`

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use study_planner::auth::AuthConfig;
use study_planner::db;
use study_planner::generation::{ChatCompletionClient, GenerationConfig};
use study_planner::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting study planner HTTP server");

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    let auth = AuthConfig::from_env()
        .and_then(|config| config.build())
        .context("Failed to configure credential verification")?;

    let generation = GenerationConfig::from_env().context("Failed to configure text generator")?;
    info!(model = %generation.model, "Text generator configured");
    let generator = Arc::new(ChatCompletionClient::new(generation)?);

    let state = AppState::new(repository, auth, generator);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
