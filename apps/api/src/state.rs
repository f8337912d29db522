use std::sync::Arc;

use crate::archive::ResumeArchive;
use crate::config::Config;
use crate::draft::validation::ValidationPolicy;
use crate::draft::DraftStore;
use crate::prefs::Preferences;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub drafts: Arc<DraftStore>,
    pub archive: Arc<ResumeArchive>,
    pub prefs: Arc<Preferences>,
    pub policy: ValidationPolicy,
    pub config: Config,
}
