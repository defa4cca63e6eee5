mod config;
mod embedding;
mod errors;
mod models;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::{Embedder, EmbeddingClient};
use crate::routes::build_router;
use crate::screening::explainer::RuleBasedExplainer;
use crate::screening::similarity::{SimilarityEngine, SimilarityMode};
use crate::screening::Screener;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; an invalid scoring table stops startup here.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let engine = build_similarity_engine(&config).await;
    info!(
        "Similarity mode: {} (lexical metric: {:?})",
        engine.mode().as_str(),
        config.lexical_metric
    );

    let screener = Screener::new(
        config.scoring.clone(),
        engine,
        Arc::new(RuleBasedExplainer),
    );

    let state = AppState {
        config: config.clone(),
        screener: Arc::new(screener),
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

/// Loads the embedding model once for semantic mode. A model that cannot be
/// reached leaves the service running on lexical similarity.
async fn build_similarity_engine(config: &Config) -> SimilarityEngine {
    match config.similarity_mode {
        SimilarityMode::Lexical => SimilarityEngine::lexical(config.lexical_metric),
        SimilarityMode::Semantic => {
            let embedder: Option<Arc<dyn Embedder>> = match &config.embedding {
                Some(embedding) => match EmbeddingClient::connect(embedding).await {
                    Ok(client) => Some(Arc::new(client)),
                    Err(e) => {
                        warn!("Embedding model unavailable ({e}); semantic scores will use lexical fallback");
                        None
                    }
                },
                None => {
                    warn!("SIMILARITY_MODE=semantic but EMBEDDING_API_URL is not set; semantic scores will use lexical fallback");
                    None
                }
            };
            SimilarityEngine::semantic(config.lexical_metric, embedder)
        }
    }
}
