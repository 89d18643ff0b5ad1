pub mod base;
pub mod pinecone;

#[cfg(test)]
pub mod mock;
