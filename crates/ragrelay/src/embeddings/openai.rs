use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::Embedder;
use crate::configs::EmbeddingConfig;
use crate::errors::EmbeddingError;

/// Client for any OpenAI-compatible `/v1/embeddings` endpoint (OpenAI, LM Studio, Ollama, ...)
pub struct OpenAiEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

impl OpenAiEmbedder {
    pub fn new(config: EmbeddingConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    fn parse_embedding(data: &Value) -> Result<Vec<f32>, EmbeddingError> {
        let values = data
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|d| d.get("embedding"))
            .and_then(|e| e.as_array())
            .ok_or_else(|| EmbeddingError::Malformed("missing data[0].embedding".to_string()))?;

        values
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| EmbeddingError::Malformed(format!("non-numeric value {}", v)))
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let url = format!("{}/v1/embeddings", self.config.host.trim_end_matches('/'));
        let payload = json!({
            "model": self.config.model,
            "input": text,
        });

        let mut request = self.client.post(&url).json(&payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let embedding = Self::parse_embedding(&body)?;

        if embedding.len() != self.config.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(host: String, dimension: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            host,
            model: "test-embedder".to_string(),
            api_key: None,
            dimension,
            timeout_secs: None,
        }
    }

    #[tokio::test]
    async fn test_embed_basic() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(body_json(json!({"model": "test-embedder", "input": "what is rust?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [{"object": "embedding", "index": 0, "embedding": [0.25, -0.5, 1.0]}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let embedder = OpenAiEmbedder::new(config(mock_server.uri(), 3))?;
        let vector = embedder.embed("what is rust?").await?;

        assert_eq!(vector, vec![0.25, -0.5, 1.0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_embed_sends_bearer_token() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [1.0]}]
            })))
            .mount(&mock_server)
            .await;

        let mut config = config(mock_server.uri(), 1);
        config.api_key = Some("secret".to_string());
        let embedder = OpenAiEmbedder::new(config)?;

        assert_eq!(embedder.embed("hi").await?, vec![1.0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_embed_error_status() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let embedder = OpenAiEmbedder::new(config(mock_server.uri(), 3))?;
        let result = embedder.embed("hello").await;

        assert!(matches!(result, Err(EmbeddingError::Status(500))));
        Ok(())
    }

    #[tokio::test]
    async fn test_embed_malformed_body() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&mock_server)
            .await;

        let embedder = OpenAiEmbedder::new(config(mock_server.uri(), 3))?;
        let result = embedder.embed("hello").await;

        assert!(matches!(result, Err(EmbeddingError::Malformed(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_embed_dimension_mismatch() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [0.1, 0.2]}]
            })))
            .mount(&mock_server)
            .await;

        let embedder = OpenAiEmbedder::new(config(mock_server.uri(), 768))?;
        let result = embedder.embed("hello").await;

        assert!(matches!(
            result,
            Err(EmbeddingError::DimensionMismatch {
                expected: 768,
                actual: 2
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_embed_unreachable_host() -> anyhow::Result<()> {
        // Nothing listens on port 9 locally
        let embedder = OpenAiEmbedder::new(config("http://127.0.0.1:9".to_string(), 3))?;
        let result = embedder.embed("hello").await;

        assert!(matches!(result, Err(EmbeddingError::Transport(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_embed_empty_input() -> anyhow::Result<()> {
        let embedder = OpenAiEmbedder::new(config("http://127.0.0.1:9".to_string(), 3))?;
        assert!(matches!(
            embedder.embed("").await,
            Err(EmbeddingError::EmptyInput)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_embed_whitespace_is_sent() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(body_json(json!({"model": "test-embedder", "input": "  "})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [0.5]}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let embedder = OpenAiEmbedder::new(config(mock_server.uri(), 1))?;
        assert_eq!(embedder.embed("  ").await?, vec![0.5]);
        Ok(())
    }
}
