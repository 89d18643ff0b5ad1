use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

use crate::augment::augment_messages;
use crate::completion::CompletionClient;
use crate::errors::IndexError;
use crate::index::base::VectorIndex;
use crate::models::message::ChatRequest;
use crate::relay::{error_events, RelayEvent};
use crate::retriever::ContextRetriever;

/// Outcome of probing the pipeline's collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Error(String),
}

/// One chat request's path: retrieve, augment, forward, relay.
///
/// Holds no per-request state, so a single instance serves concurrent requests.
pub struct RagPipeline {
    retriever: ContextRetriever,
    completion: CompletionClient,
    index: Arc<dyn VectorIndex>,
    dimension: usize,
}

impl RagPipeline {
    pub fn new(
        retriever: ContextRetriever,
        completion: CompletionClient,
        index: Arc<dyn VectorIndex>,
        dimension: usize,
    ) -> Self {
        Self {
            retriever,
            completion,
            index,
            dimension,
        }
    }

    /// Splice context for the last user message into the conversation
    pub async fn augment(&self, mut request: ChatRequest) -> ChatRequest {
        let Some(query) = request.last_user_message().map(str::to_string) else {
            tracing::debug!("No user message, forwarding unchanged");
            return request;
        };

        tracing::info!(query = %query, "processing new query");
        let context = self.retriever.retrieve(&query).await;
        if context.is_empty() {
            tracing::info!("No relevant context found");
            return request;
        }

        let original = std::mem::take(&mut request.messages);
        request.messages = augment_messages(original, &context);
        tracing::debug!(messages = ?request.messages, "augmented messages");
        request
    }

    /// Augment `request`, forward it, and stream back the backend's events.
    ///
    /// Always yields a stream; a backend that cannot be reached or answers with
    /// an error status produces an error payload followed by the sentinel.
    pub async fn chat(&self, request: ChatRequest) -> BoxStream<'static, RelayEvent> {
        let request = self.augment(request).await;

        tracing::info!("Forwarding to completion backend");
        match self.completion.stream_chat(&request).await {
            Ok(relay) => relay.boxed(),
            Err(e) => {
                tracing::error!("Completion backend unavailable: {}", e);
                stream::iter(error_events(e)).boxed()
            }
        }
    }

    pub async fn health(&self) -> HealthStatus {
        if let Err(e) = self.completion.health().await {
            tracing::warn!("Completion backend health check failed: {}", e);
            return HealthStatus::Error("Cannot connect to completion backend".to_string());
        }

        match self.check_index().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Error(e.to_string()),
        }
    }

    async fn check_index(&self) -> Result<(), IndexError> {
        let zero = vec![0.0_f32; self.dimension];
        self.index.query(&zero, 1, false).await.map(|_| ())
    }
}
