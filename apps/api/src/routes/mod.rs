pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{archive, draft, prefs, render};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Draft API
        .route(
            "/api/v1/draft",
            get(draft::handlers::get_draft)
                .patch(draft::handlers::update_draft)
                .put(draft::handlers::replace_draft)
                .delete(draft::handlers::clear_draft),
        )
        .route("/api/v1/draft/status", get(draft::handlers::draft_status))
        .route(
            "/api/v1/draft/validate",
            post(draft::handlers::validate_draft),
        )
        // Saved resumes
        .route(
            "/api/v1/resumes",
            get(archive::handlers::list_resumes).post(archive::handlers::save_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(archive::handlers::get_resume).delete(archive::handlers::delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/load",
            post(archive::handlers::load_resume),
        )
        // Rendering and export
        .route("/api/v1/preview", get(render::handlers::preview))
        .route("/api/v1/export", post(render::handlers::export))
        // Preferences
        .route(
            "/api/v1/preferences",
            get(prefs::handle_get_preferences).put(prefs::handle_put_preferences),
        )
        .with_state(state)
}
