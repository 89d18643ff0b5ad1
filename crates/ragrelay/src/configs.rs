use serde::Deserialize;

pub const EMBEDDING_HOST: &str = "http://localhost:1234";
pub const EMBEDDING_MODEL: &str = "text-embedding-nomic-embed-text-v1.5@q4_k_m";
pub const EMBEDDING_DIMENSION: usize = 768;
pub const COMPLETION_HOST: &str = "http://localhost:1234";
pub const COMPLETION_HEALTH_PATH: &str = "/v1/health";
pub const TOP_K: usize = 3;
pub const RELEVANCE_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_host")]
    pub host: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Request timeout in seconds, unbounded when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            host: default_embedding_host(),
            model: default_embedding_model(),
            api_key: None,
            dimension: default_dimension(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PineconeConfig {
    /// Data-plane host of the index, e.g. https://my-index-abc123.svc.pinecone.io
    pub host: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            host: default_completion_host(),
            api_key: None,
            health_path: default_health_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Matches must score strictly above this to be used as context
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: TOP_K,
            threshold: RELEVANCE_THRESHOLD,
        }
    }
}

fn default_embedding_host() -> String {
    EMBEDDING_HOST.to_string()
}

fn default_embedding_model() -> String {
    EMBEDDING_MODEL.to_string()
}

fn default_dimension() -> usize {
    EMBEDDING_DIMENSION
}

fn default_completion_host() -> String {
    COMPLETION_HOST.to_string()
}

fn default_health_path() -> String {
    COMPLETION_HEALTH_PATH.to_string()
}

fn default_top_k() -> usize {
    TOP_K
}

fn default_threshold() -> f64 {
    RELEVANCE_THRESHOLD
}
