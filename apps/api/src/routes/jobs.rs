use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::batch::{self, BatchOutcome};
use crate::errors::AppError;
use crate::ingest::ScrapeSummary;
use crate::materials::{self, GeneratedMaterials};
use crate::models::job::{Job, JobUpdate};
use crate::models::material::Material;
use crate::state::AppState;
use crate::store::JobListFilter;

#[derive(Deserialize)]
pub struct GenerateAllRequest {
    pub min_score: Option<i64>,
}

#[derive(Serialize)]
pub struct ScoredJobResponse {
    pub job: Job,
}

/// POST /api/scrape
pub async fn handle_scrape(
    State(state): State<AppState>,
) -> Result<Json<ScrapeSummary>, AppError> {
    state.cancel.reset();
    let summary = state
        .ingestor
        .scrape_all(&state.store, &state.cancel)
        .await?;
    Ok(Json(summary))
}

/// POST /api/scrape/score
pub async fn handle_score_all(
    State(state): State<AppState>,
) -> Result<Json<BatchOutcome>, AppError> {
    state.cancel.reset();
    let outcome = batch::score_all_unscored(
        &state.store,
        state.scorer.as_ref(),
        state.config.score_delay_ms,
        &state.cancel,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/scrape/generate
pub async fn handle_generate_all(
    State(state): State<AppState>,
    body: Option<Json<GenerateAllRequest>>,
) -> Result<Json<BatchOutcome>, AppError> {
    state.cancel.reset();
    let min_score = body
        .and_then(|Json(req)| req.min_score)
        .unwrap_or(state.config.min_materials_score);
    let outcome = batch::generate_all_materials(
        &state.store,
        &state.llm,
        min_score,
        state.config.generate_delay_ms,
        &state.cancel,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/scrape/cancel
/// Flags the current scrape or batch; it stops after the item in flight.
pub async fn handle_cancel(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.cancel.cancel();
    Json(serde_json::json!({ "cancelled": true }))
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobListFilter>,
) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = state.store.list_jobs(&filter).await?;
    Ok(Json(jobs))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Job>, AppError> {
    let job = state.store.get_job(id).await?;
    Ok(Json(job))
}

/// POST /api/jobs/:id/score
pub async fn handle_score_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScoredJobResponse>, AppError> {
    let job = state.store.get_job(id).await?;
    let profile = state.store.profile_or_default().await?;

    // Scoring degrades internally; an Err here is a programming error in
    // a non-default scorer, surfaced as a 500.
    let result = state
        .scorer
        .score(&job, &profile)
        .await
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;

    let update = JobUpdate {
        score: Some(result.score),
        score_reason: Some(result.reason),
        keywords: Some(result.keywords),
        ..Default::default()
    };
    let job = state.store.update_job(id, &update).await?;
    Ok(Json(ScoredJobResponse { job }))
}

/// POST /api/jobs/:id/materials
pub async fn handle_generate_materials(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GeneratedMaterials>, AppError> {
    let generated = materials::generate_for_job(&state.store, &state.llm, id).await?;
    Ok(Json(generated))
}

/// GET /api/materials/job/:id
pub async fn handle_job_materials(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Material>>, AppError> {
    // 404 for unknown jobs rather than an empty list.
    state.store.get_job(id).await?;
    let materials = state.store.materials_for_job(id).await?;
    Ok(Json(materials))
}
