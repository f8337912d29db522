//! HTTP handlers for previewing and exporting the rendered document.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{self, page_count};
use crate::models::template::TemplateId;
use crate::render::{render, RenderedDocument};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewParams {
    /// Template key override; falls back to the draft's own template.
    pub template: Option<String>,
}

/// GET /api/v1/preview
pub async fn preview(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> Json<RenderedDocument> {
    let draft = state.drafts.get().await;
    let template = params
        .template
        .as_deref()
        .map(TemplateId::from_key)
        .unwrap_or(draft.template);
    Json(render(&draft, template))
}

/// POST /api/v1/export — renders the draft and streams back a PDF.
pub async fn export(
    State(state): State<AppState>,
) -> Result<(StatusCode, HeaderMap, Vec<u8>), AppError> {
    let draft = state.drafts.get().await;
    let filename = export::export_filename(&draft.basic_info);
    let doc = render(&draft, draft.template);
    let pages = page_count(&doc);

    // PDF assembly is CPU-bound; keep it off the async runtime.
    let bytes = tokio::task::spawn_blocking(move || export::export_pdf(&doc))
        .await
        .map_err(|e| anyhow::anyhow!("export task panicked: {e}"))??;

    info!(%filename, pages, size = bytes.len(), "Exported PDF");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    let disposition = format!("attachment; filename=\"{filename}\"");
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| anyhow::anyhow!("invalid disposition header: {e}"))?,
    );
    Ok((StatusCode::OK, headers, bytes))
}
