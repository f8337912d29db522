//! HTTP handlers for the saved-resume collection.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeDraft, SavedResume};
use crate::state::AppState;

/// GET /api/v1/resumes — newest first.
pub async fn list_resumes(State(state): State<AppState>) -> Json<Vec<SavedResume>> {
    Json(state.archive.list().await)
}

/// POST /api/v1/resumes — snapshots the current draft.
pub async fn save_resume(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SavedResume>), AppError> {
    let draft = state.drafts.get().await;
    let saved = state.archive.save(draft).await?;
    info!(id = %saved.id, "Resume saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/resumes/:id
pub async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SavedResume>, AppError> {
    state
        .archive
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No saved resume with id {id}")))
}

/// POST /api/v1/resumes/:id/load — replaces the working draft with a snapshot.
pub async fn load_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeDraft>, AppError> {
    let saved = state
        .archive
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No saved resume with id {id}")))?;
    let draft = state.drafts.replace(saved.data).await?;
    info!(%id, "Resume loaded into draft");
    Ok(Json(draft))
}

/// DELETE /api/v1/resumes/:id — 204 whether or not the id existed.
pub async fn delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.archive.delete(id).await?;
    if removed {
        info!(%id, "Resume deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
