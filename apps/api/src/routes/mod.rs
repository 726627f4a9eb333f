pub mod health;
pub mod jobs;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scraping + batch drivers
        .route("/api/scrape", post(jobs::handle_scrape))
        .route("/api/scrape/score", post(jobs::handle_score_all))
        .route("/api/scrape/generate", post(jobs::handle_generate_all))
        .route("/api/scrape/cancel", post(jobs::handle_cancel))
        // Jobs
        .route("/api/jobs", get(jobs::handle_list_jobs))
        .route("/api/jobs/:id", get(jobs::handle_get_job))
        .route("/api/jobs/:id/score", post(jobs::handle_score_job))
        .route("/api/jobs/:id/materials", post(jobs::handle_generate_materials))
        // Materials
        .route("/api/materials/job/:id", get(jobs::handle_job_materials))
        .with_state(state)
}
