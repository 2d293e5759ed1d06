use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup around the shared skill lexicon; read-only afterwards.
    pub analyzer: Arc<Analyzer>,
    pub config: Config,
}
