mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::ingest::handle_ingest;
use commands::retrieve::handle_retrieve;
use commands::version::print_version;
use ragrelay::configs::{
    EmbeddingConfig, PineconeConfig, EMBEDDING_DIMENSION, EMBEDDING_HOST, EMBEDDING_MODEL,
    RELEVANCE_THRESHOLD, TOP_K,
};
use ragrelay::ingest::DEFAULT_BATCH_SIZE;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// Where to find the embedding provider and the vector index
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Embedding provider base URL
    #[arg(long, env = "RAGRELAY_EMBEDDING__HOST", default_value = EMBEDDING_HOST)]
    embedding_host: String,

    /// Embedding model identifier
    #[arg(long, env = "RAGRELAY_EMBEDDING__MODEL", default_value = EMBEDDING_MODEL)]
    embedding_model: String,

    /// Embedding provider API key, if it needs one
    #[arg(long, env = "RAGRELAY_EMBEDDING__API_KEY", hide_env_values = true)]
    embedding_api_key: Option<String>,

    /// Width of the index's vectors
    #[arg(long, env = "RAGRELAY_EMBEDDING__DIMENSION", default_value_t = EMBEDDING_DIMENSION)]
    dimension: usize,

    /// Vector index data-plane host
    #[arg(long, env = "RAGRELAY_INDEX__HOST")]
    index_host: String,

    /// Vector index API key
    #[arg(long, env = "RAGRELAY_INDEX__API_KEY", hide_env_values = true)]
    index_api_key: String,
}

impl ConnectionArgs {
    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            host: self.embedding_host.clone(),
            model: self.embedding_model.clone(),
            api_key: self.embedding_api_key.clone(),
            dimension: self.dimension,
            timeout_secs: None,
        }
    }

    pub fn index_config(&self) -> PineconeConfig {
        PineconeConfig {
            host: self.index_host.clone(),
            api_key: self.index_api_key.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Embed documents from a JSON file and load them into the vector index
    Ingest {
        /// JSON array of {"id": ..., "text": ...} documents
        path: PathBuf,

        /// Records per upsert request
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Show the context that would be injected for a query
    Retrieve {
        query: String,

        /// Matches requested from the index
        #[arg(long, default_value_t = TOP_K)]
        top_k: usize,

        /// Minimum score, exclusive
        #[arg(long, default_value_t = RELEVANCE_THRESHOLD)]
        threshold: f64,

        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Print the CLI version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Ingest {
            path,
            batch_size,
            connection,
        }) => handle_ingest(&path, batch_size, &connection).await,
        Some(Command::Retrieve {
            query,
            top_k,
            threshold,
            connection,
        }) => handle_retrieve(&query, top_k, threshold, &connection).await,
        Some(Command::Version) | None => {
            print_version();
            Ok(())
        }
    }
}
