use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::IndexError;

/// One ranked hit returned by a vector query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    #[serde(default)]
    pub id: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievalMatch {
    pub fn new<S: Into<String>>(id: S, score: f64, text: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert("text".to_string(), Value::String(text.to_string()));
        Self {
            id: id.into(),
            score,
            metadata,
        }
    }

    /// The passage stored alongside the vector, empty when absent
    pub fn text(&self) -> &str {
        self.metadata
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// A vector plus metadata, as written by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Map<String, Value>,
}

impl IndexRecord {
    pub fn with_text<S: Into<String>>(id: S, values: Vec<f32>, text: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert("text".to_string(), Value::String(text.to_string()));
        Self {
            id: id.into(),
            values,
            metadata,
        }
    }
}

/// Nearest-neighbour store the retriever queries and ingestion writes to
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Top `top_k` matches for `vector`, best first
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>, IndexError>;

    /// Insert or overwrite records, returning how many were written
    async fn upsert(&self, records: &[IndexRecord]) -> Result<usize, IndexError>;
}
