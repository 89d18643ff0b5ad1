//! Offline loading of documents into the vector index
use serde::{Deserialize, Serialize};

use crate::embeddings::base::Embedder;
use crate::index::base::{IndexRecord, VectorIndex};

pub const DEFAULT_BATCH_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents that produced an embedding
    pub embedded: usize,
    /// Ids of documents whose embedding failed
    pub skipped: Vec<String>,
    /// Records the index reported as written
    pub upserted: usize,
    /// One-based numbers of batches the index rejected
    pub failed_batches: Vec<usize>,
}

/// Embed every document and upsert the results in fixed-size batches.
///
/// Failures are logged and skipped, never retried: a document that cannot be
/// embedded is left out, and a rejected batch is dropped as a whole.
pub async fn ingest_documents(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    documents: &[Document],
    batch_size: usize,
) -> IngestReport {
    let batch_size = batch_size.max(1);
    let mut report = IngestReport::default();
    let mut records = Vec::with_capacity(documents.len());

    for doc in documents {
        tracing::info!(id = %doc.id, "processing document");
        match embedder.embed(&doc.text).await {
            Ok(values) => records.push(IndexRecord::with_text(doc.id.clone(), values, &doc.text)),
            Err(e) => {
                tracing::warn!(id = %doc.id, "Failed to generate embedding: {}", e);
                report.skipped.push(doc.id.clone());
            }
        }
    }
    report.embedded = records.len();

    for (i, batch) in records.chunks(batch_size).enumerate() {
        let number = i + 1;
        match index.upsert(batch).await {
            Ok(count) => {
                tracing::info!(batch = number, vectors = count, "upserted batch");
                report.upserted += count;
            }
            Err(e) => {
                tracing::error!(batch = number, "Error upserting batch: {}", e);
                report.failed_batches.push(number);
            }
        }
    }

    tracing::info!(
        embedded = report.embedded,
        upserted = report.upserted,
        "ingestion complete"
    );
    report
}
