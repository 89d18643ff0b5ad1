use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::base::{IndexRecord, RetrievalMatch, VectorIndex};
use crate::configs::PineconeConfig;
use crate::errors::IndexError;

const API_VERSION: &str = "2024-07";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RetrievalMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

/// Data-plane client for a single Pinecone index.
///
/// Built once at startup and shared by reference; it holds no mutable state,
/// and dropping the last handle closes its connection pool.
pub struct PineconeIndex {
    client: Client,
    config: PineconeConfig,
}

impl PineconeIndex {
    pub fn new(config: PineconeConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    async fn post(&self, endpoint: &str, payload: Value) -> Result<Value, IndexError> {
        let url = format!("{}/{}", self.config.host.trim_end_matches('/'), endpoint);

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(IndexError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>, IndexError> {
        let payload = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": include_metadata,
        });

        let response = self.post("query", payload).await?;
        let parsed: QueryResponse =
            serde_json::from_value(response).map_err(|e| IndexError::Malformed(e.to_string()))?;

        Ok(parsed.matches)
    }

    async fn upsert(&self, records: &[IndexRecord]) -> Result<usize, IndexError> {
        let response = self
            .post("vectors/upsert", json!({ "vectors": records }))
            .await?;
        let parsed: UpsertResponse =
            serde_json::from_value(response).map_err(|e| IndexError::Malformed(e.to_string()))?;

        Ok(parsed.upserted_count)
    }
}
