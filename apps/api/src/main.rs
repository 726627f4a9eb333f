mod batch;
mod config;
mod db;
mod errors;
mod ingest;
mod llm;
mod materials;
mod models;
mod routes;
mod scoring;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::CancelFlag;
use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::ingest::adapters::default_adapters;
use crate::ingest::fetch::HttpClient;
use crate::ingest::filter::{FilterRules, RelevanceFilter};
use crate::ingest::Ingestor;
use crate::llm::OllamaClient;
use crate::routes::build_router;
use crate::scoring::{LlmJobScorer, ScoringOptions};
use crate::state::AppState;
use crate::store::JobStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobscout API v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;
    let store = JobStore::new(pool);

    let llm = OllamaClient::new(config.ollama_url.clone(), config.ollama_model.clone())?;
    info!("Ollama client initialized (model: {})", llm.model());

    let scorer = Arc::new(LlmJobScorer::new(
        Arc::new(llm.clone()),
        ScoringOptions {
            preferred_location: config.preferred_location.clone(),
        },
    ));

    let rules = match &config.filter_rules_path {
        Some(path) => FilterRules::from_file(Path::new(path))?,
        None => FilterRules::default(),
    };
    let ingestor = Arc::new(Ingestor::new(
        default_adapters(),
        HttpClient::new()?,
        RelevanceFilter::new(rules),
        config.source_delay_ms,
    ));

    let state = AppState {
        store,
        llm,
        scorer,
        ingestor,
        cancel: CancelFlag::new(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
