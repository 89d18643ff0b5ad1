pub mod ingest;
pub mod retrieve;
pub mod version;
