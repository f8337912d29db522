//! HTTP handlers for the working draft.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::draft::validation::{self, FieldIssue, FormStep};
use crate::draft::DraftPatch;
use crate::errors::AppError;
use crate::models::resume::ResumeDraft;
use crate::state::AppState;
use crate::storage::SyncStatus;

/// GET /api/v1/draft
pub async fn get_draft(State(state): State<AppState>) -> Json<ResumeDraft> {
    Json(state.drafts.get().await)
}

/// PATCH /api/v1/draft — shallow merge of the provided top-level fields.
pub async fn update_draft(
    State(state): State<AppState>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<ResumeDraft>, AppError> {
    let draft = state.drafts.update(patch).await?;
    Ok(Json(draft))
}

/// PUT /api/v1/draft — replaces the whole draft.
pub async fn replace_draft(
    State(state): State<AppState>,
    Json(full): Json<ResumeDraft>,
) -> Result<Json<ResumeDraft>, AppError> {
    let draft = state.drafts.replace(full).await?;
    Ok(Json(draft))
}

/// DELETE /api/v1/draft — resets to the empty shape.
pub async fn clear_draft(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.drafts.clear().await?;
    info!("Draft cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/draft/status
pub async fn draft_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.drafts.sync_status())
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub step: FormStep,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub issues: Vec<FieldIssue>,
    pub can_advance: bool,
}

/// POST /api/v1/draft/validate
pub async fn validate_draft(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let draft = state.drafts.get().await;
    let issues = validation::validate_step(&draft, req.step, &state.policy);
    let can_advance = validation::step_can_advance(&issues);
    Json(ValidateResponse {
        issues,
        can_advance,
    })
}
