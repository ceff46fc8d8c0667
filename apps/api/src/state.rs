use std::sync::Arc;

use crate::llm_client::ModelService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The model service every pipeline step calls. `LlmClient` in production.
    pub llm: Arc<dyn ModelService>,
}
