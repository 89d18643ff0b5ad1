use async_trait::async_trait;
use std::sync::Mutex;

use super::base::{IndexRecord, RetrievalMatch, VectorIndex};
use crate::errors::IndexError;

/// An index that returns a fixed ranking, truncated to `top_k` like a real index
pub struct MockIndex {
    matches: Vec<RetrievalMatch>,
    fail_queries: bool,
    fail_upserts_at: Vec<usize>,
    upsert_calls: Mutex<usize>,
    upserts: Mutex<Vec<Vec<IndexRecord>>>,
    queries: Mutex<Vec<(usize, usize, bool)>>,
}

impl MockIndex {
    pub fn new(matches: Vec<RetrievalMatch>) -> Self {
        Self {
            matches,
            fail_queries: false,
            fail_upserts_at: Vec::new(),
            upsert_calls: Mutex::new(0),
            upserts: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_queries: true,
            ..Self::new(Vec::new())
        }
    }

    /// Fail the upsert calls with these zero-based call numbers
    pub fn failing_upserts(calls: Vec<usize>) -> Self {
        Self {
            fail_upserts_at: calls,
            ..Self::new(Vec::new())
        }
    }

    /// Batches successfully written so far
    pub fn upserts(&self) -> Vec<Vec<IndexRecord>> {
        self.upserts.lock().unwrap().clone()
    }

    /// (vector length, top_k, include_metadata) per query
    pub fn queries(&self) -> Vec<(usize, usize, bool)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for MockIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>, IndexError> {
        self.queries
            .lock()
            .unwrap()
            .push((vector.len(), top_k, include_metadata));
        if self.fail_queries {
            return Err(IndexError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }

    async fn upsert(&self, records: &[IndexRecord]) -> Result<usize, IndexError> {
        let call = {
            let mut calls = self.upsert_calls.lock().unwrap();
            let call = *calls;
            *calls += 1;
            call
        };
        if self.fail_upserts_at.contains(&call) {
            return Err(IndexError::Malformed(format!("upsert call {} rejected", call)));
        }
        self.upserts.lock().unwrap().push(records.to_vec());
        Ok(records.len())
    }
}
