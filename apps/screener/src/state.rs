use std::sync::Arc;

use crate::config::Config;
use crate::screening::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Scoring pipeline. Read-only after startup, shared by every request.
    pub screener: Arc<Screener>,
}
