use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;

use crate::configs::CompletionConfig;
use crate::errors::CompletionError;
use crate::models::message::ChatRequest;
use crate::relay::RelayStream;

pub type BackendRelay = RelayStream<BoxStream<'static, Result<Bytes, reqwest::Error>>>;

/// Client for an OpenAI-compatible chat completion backend
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(api_key) => request.header("Authorization", format!("Bearer {}", api_key)),
            None => request,
        }
    }

    /// Forward `request` and relay the streamed response.
    ///
    /// A non-success status is reported before any streaming starts.
    pub async fn stream_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<BackendRelay, CompletionError> {
        let response = self
            .authorize(self.client.post(self.url("/v1/chat/completions")))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status.as_u16()));
        }

        Ok(RelayStream::new(response.bytes_stream().boxed()))
    }

    /// Check the backend answers its health endpoint
    pub async fn health(&self) -> Result<(), CompletionError> {
        let response = self
            .authorize(self.client.get(self.url(&self.config.health_path)))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CompletionError::Status(status.as_u16()))
        }
    }
}
