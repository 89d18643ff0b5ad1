use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Cannot embed empty text")]
    EmptyInput,

    #[error("Embedding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Embedding provider returned status {0}")]
    Status(u16),

    #[error("Malformed embedding response: {0}")]
    Malformed(String),

    #[error("Embedding has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Vector index request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Vector index returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed vector index response: {0}")]
    Malformed(String),
}

/// Why no context could be retrieved for a query.
///
/// Never surfaced to chat callers; the retriever degrades to an empty context.
#[derive(Error, Debug)]
pub enum RetrievalUnavailable {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion backend error {0}")]
    Status(u16),
}
