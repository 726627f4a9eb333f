use std::sync::Arc;

use crate::batch::CancelFlag;
use crate::config::Config;
use crate::ingest::Ingestor;
use crate::llm::OllamaClient;
use crate::scoring::JobScorer;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub llm: OllamaClient,
    /// Pluggable scorer; the trait seam keeps handlers testable.
    pub scorer: Arc<dyn JobScorer>,
    pub ingestor: Arc<Ingestor>,
    /// One flag shared by scrape and batch runs.
    pub cancel: CancelFlag,
    pub config: Config,
}
