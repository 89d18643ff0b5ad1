use anyhow::Result;
use console::style;
use ragrelay::configs::RetrievalConfig;
use ragrelay::embeddings::openai::OpenAiEmbedder;
use ragrelay::index::pinecone::PineconeIndex;
use ragrelay::retriever::ContextRetriever;
use std::sync::Arc;

use crate::ConnectionArgs;

pub async fn handle_retrieve(
    query: &str,
    top_k: usize,
    threshold: f64,
    connection: &ConnectionArgs,
) -> Result<()> {
    let embedder = Arc::new(OpenAiEmbedder::new(connection.embedding_config())?);
    let index = Arc::new(PineconeIndex::new(connection.index_config())?);
    let retriever = ContextRetriever::new(embedder, index, RetrievalConfig { top_k, threshold });

    // Report retrieval failures rather than printing an empty context
    let context = retriever.try_retrieve(query).await?;
    if context.is_empty() {
        println!("{}", style("No context met the relevance threshold").dim());
    } else {
        println!("{}", context);
    }
    Ok(())
}
