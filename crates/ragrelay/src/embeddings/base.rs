use async_trait::async_trait;

use crate::errors::EmbeddingError;

/// Turns text into a fixed-width vector for similarity search
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single piece of text. One attempt, no retries.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Width of the vectors this embedder produces
    fn dimension(&self) -> usize;
}
