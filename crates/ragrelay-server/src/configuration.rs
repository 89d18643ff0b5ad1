use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use config::{Config, Environment};
use ragrelay::configs::{
    CompletionConfig, EmbeddingConfig, PineconeConfig, RetrievalConfig, COMPLETION_HEALTH_PATH,
    COMPLETION_HOST, EMBEDDING_DIMENSION, EMBEDDING_HOST, EMBEDDING_MODEL, RELEVANCE_THRESHOLD,
    TOP_K,
};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    pub index: PineconeConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("embedding.host", EMBEDDING_HOST)?
            .set_default("embedding.model", EMBEDDING_MODEL)?
            .set_default("embedding.dimension", EMBEDDING_DIMENSION as u64)?
            .set_default("completion.host", COMPLETION_HOST)?
            .set_default("completion.health_path", COMPLETION_HEALTH_PATH)?
            .set_default("retrieval.top_k", TOP_K as u64)?
            .set_default("retrieval.threshold", RELEVANCE_THRESHOLD)?
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        match config.try_deserialize::<Self>() {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                if let Some(field) = missing_field(&err.to_string()) {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(&field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

/// Dotted key named by a serde "missing field" error, e.g.
/// "missing field `api_key` for key `index`" -> "index.api_key"
fn missing_field(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let (field, rest) = rest.split_once('`')?;

    match rest.split_once("for key `") {
        Some((_, key)) => {
            let key = key.split('`').next().unwrap_or_default();
            Some(format!("{}.{}", key, field))
        }
        None => Some(field.to_string()),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9215
}
