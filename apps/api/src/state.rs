use std::sync::Arc;

use crate::llm_client::ChatModel;
use crate::sources::SourceStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat backend. `LlmClient` in production, a mock in tests.
    pub llm: Arc<dyn ChatModel>,
    pub sources: SourceStore,
}
