//! Theme and language preferences, each persisted under its own storage key.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::{self, keys, KeyValueStore, StoreError, WriteQueue};

const DEFAULT_THEME: &str = "light";
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferencesView {
    pub theme: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreferencesUpdate {
    pub theme: Option<String>,
    pub language: Option<String>,
}

pub struct Preferences {
    theme: RwLock<String>,
    language: RwLock<String>,
    queue: Arc<WriteQueue>,
}

impl Preferences {
    pub async fn load(store: &dyn KeyValueStore, queue: Arc<WriteQueue>) -> Self {
        let theme = storage::get_json(store, keys::THEME, DEFAULT_THEME.to_string()).await;
        let language = storage::get_json(store, keys::LANGUAGE, DEFAULT_LANGUAGE.to_string()).await;
        Preferences {
            theme: RwLock::new(theme),
            language: RwLock::new(language),
            queue,
        }
    }

    pub async fn get(&self) -> PreferencesView {
        PreferencesView {
            theme: self.theme.read().await.clone(),
            language: self.language.read().await.clone(),
        }
    }

    /// Applies the fields present in `update`; each changed value persists
    /// under its own key. Enqueued under the write guard so queue order
    /// matches mutation order.
    pub async fn set(&self, update: PreferencesUpdate) -> Result<PreferencesView, StoreError> {
        if let Some(theme) = update.theme {
            let mut guard = self.theme.write().await;
            *guard = theme;
            self.queue.enqueue(keys::THEME, &*guard)?;
        }
        if let Some(language) = update.language {
            let mut guard = self.language.write().await;
            *guard = language;
            self.queue.enqueue(keys::LANGUAGE, &*guard)?;
        }
        Ok(self.get().await)
    }
}

/// GET /api/v1/preferences
pub async fn handle_get_preferences(State(state): State<AppState>) -> Json<PreferencesView> {
    Json(state.prefs.get().await)
}

/// PUT /api/v1/preferences
pub async fn handle_put_preferences(
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<PreferencesView>, AppError> {
    if update.theme.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("theme must not be empty".to_string()));
    }
    if update
        .language
        .as_deref()
        .is_some_and(|l| l.trim().is_empty())
    {
        return Err(AppError::Validation(
            "language must not be empty".to_string(),
        ));
    }
    let view = state.prefs.set(update).await?;
    Ok(Json(view))
}
