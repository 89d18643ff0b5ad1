pub mod augment;
pub mod completion;
pub mod configs;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod relay;
pub mod retriever;
