use anyhow::{Context, Result};
use cliclack::spinner;
use console::style;
use ragrelay::embeddings::openai::OpenAiEmbedder;
use ragrelay::index::pinecone::PineconeIndex;
use ragrelay::ingest::{ingest_documents, Document};
use std::fs;
use std::path::Path;

use crate::ConnectionArgs;

pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| {
        format!(
            "{} is not a JSON array of {{id, text}} documents",
            path.display()
        )
    })
}

pub async fn handle_ingest(
    path: &Path,
    batch_size: usize,
    connection: &ConnectionArgs,
) -> Result<()> {
    let documents = load_documents(path)?;
    let embedder = OpenAiEmbedder::new(connection.embedding_config())?;
    let index = PineconeIndex::new(connection.index_config())?;

    let spin = spinner();
    spin.start(format!("ingesting {} documents", documents.len()));
    let report = ingest_documents(&embedder, &index, &documents, batch_size).await;
    spin.stop(format!(
        "{} of {} documents upserted",
        report.upserted,
        documents.len()
    ));

    for id in &report.skipped {
        println!("{} {}", style("no embedding:").yellow(), id);
    }
    for batch in &report.failed_batches {
        println!("{} {}", style("failed batch:").red(), batch);
    }

    Ok(())
}
