pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screen/resume", post(handlers::handle_screen_resume))
        .route("/api/v1/screen/batch", post(handlers::handle_screen_batch))
        .route(
            "/api/v1/screen/pdf",
            post(handlers::handle_screen_pdf).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
