mod configuration;
mod error;
mod routes;
mod state;

#[cfg(test)]
mod testing;

use ragrelay::{
    completion::CompletionClient,
    embeddings::{base::Embedder, openai::OpenAiEmbedder},
    index::pinecone::PineconeIndex, pipeline::RagPipeline, retriever::ContextRetriever,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let settings = configuration::Settings::new()?;

    // Collaborators are created once here and shared read-only by every request
    let embedder = Arc::new(OpenAiEmbedder::new(settings.embedding)?);
    let dimension = embedder.dimension();
    let index = Arc::new(PineconeIndex::new(settings.index)?);
    info!("Vector index client initialized");
    let completion = CompletionClient::new(settings.completion)?;
    let retriever = ContextRetriever::new(embedder, index.clone(), settings.retrieval);
    let state = state::AppState::new(RagPipeline::new(retriever, completion, index, dimension));

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(settings.server.socket_addr()?).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
