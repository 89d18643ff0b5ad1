use async_trait::async_trait;
use std::sync::Mutex;

use super::base::Embedder;
use crate::errors::EmbeddingError;

/// An embedder returning a fixed vector, or failing on demand
pub struct MockEmbedder {
    vector: Option<Vec<f32>>,
    calls: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector: Some(vector),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the provider answered 503
    pub fn failing() -> Self {
        Self {
            vector: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.vector.clone().ok_or(EmbeddingError::Status(503))
    }

    fn dimension(&self) -> usize {
        self.vector.as_ref().map(Vec::len).unwrap_or(0)
    }
}
