use std::sync::Arc;

use crate::interview::model::InterviewModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable interview collaborator. Default: OpenAiInterviewModel
    /// over the shared LLM client; tests substitute deterministic stubs.
    pub interview: Arc<dyn InterviewModel>,
}
