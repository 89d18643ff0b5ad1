use ragrelay::pipeline::RagPipeline;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: RagPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
