use crate::state::AppState;
use axum::body::Body;
use axum::response::Response;
use http_body_util::BodyExt;
use ragrelay::completion::CompletionClient;
use ragrelay::configs::{CompletionConfig, EmbeddingConfig, PineconeConfig, RetrievalConfig};
use ragrelay::embeddings::openai::OpenAiEmbedder;
use ragrelay::index::pinecone::PineconeIndex;
use ragrelay::pipeline::RagPipeline;
use ragrelay::retriever::ContextRetriever;
use std::sync::Arc;

pub const DIMENSION: usize = 3;

/// App state whose embedding provider, index and completion backend all live at `host`
pub fn state_for(host: &str) -> AppState {
    let embedder = Arc::new(
        OpenAiEmbedder::new(EmbeddingConfig {
            host: host.to_string(),
            dimension: DIMENSION,
            ..EmbeddingConfig::default()
        })
        .unwrap(),
    );
    let index = Arc::new(
        PineconeIndex::new(PineconeConfig {
            host: host.to_string(),
            api_key: "pc-test".to_string(),
        })
        .unwrap(),
    );
    let completion = CompletionClient::new(CompletionConfig {
        host: host.to_string(),
        ..CompletionConfig::default()
    })
    .unwrap();

    let retriever = ContextRetriever::new(embedder, index.clone(), RetrievalConfig::default());
    AppState::new(RagPipeline::new(retriever, completion, index, DIMENSION))
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
