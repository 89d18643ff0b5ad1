use std::sync::Arc;

use crate::configs::RetrievalConfig;
use crate::embeddings::base::Embedder;
use crate::errors::RetrievalUnavailable;
use crate::index::base::VectorIndex;

const PREVIEW_CHARS: usize = 200;

/// Finds passages relevant to a query and joins them into one context blob
pub struct ContextRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    config: RetrievalConfig,
}

impl ContextRetriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Context for `query`, or the reason retrieval could not run.
    ///
    /// `Ok("")` means retrieval worked but nothing cleared the threshold.
    pub async fn try_retrieve(&self, query: &str) -> Result<String, RetrievalUnavailable> {
        let vector = self.embedder.embed(query).await?;
        let matches = self.index.query(&vector, self.config.top_k, true).await?;

        let mut contexts = Vec::new();
        for m in &matches {
            tracing::debug!(
                id = %m.id,
                score = m.score,
                preview = %m.text().chars().take(PREVIEW_CHARS).collect::<String>(),
                "retrieved match"
            );
            if m.score > self.config.threshold {
                contexts.push(m.text());
            }
        }

        if contexts.is_empty() {
            tracing::info!(
                threshold = self.config.threshold,
                "no contexts met the relevance threshold"
            );
            return Ok(String::new());
        }

        tracing::info!(count = contexts.len(), "returning relevant contexts");
        Ok(contexts.join("\n\n"))
    }

    /// Context for `query`, empty when nothing relevant was found or retrieval failed
    pub async fn retrieve(&self, query: &str) -> String {
        match self.try_retrieve(query).await {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!("Retrieval unavailable, continuing without context: {}", e);
                String::new()
            }
        }
    }
}
