//! Saved-resume collection.
//!
//! Snapshots live in one JSON array under a single storage key; every save or
//! delete is a full read-modify-write of that array. Two processes editing
//! the same data directory race with last-write-wins — a known limitation,
//! fine for a single-user local tool.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{ResumeDraft, SavedResume};
use crate::storage::{self, keys, KeyValueStore, StoreError, WriteQueue};

pub struct ResumeArchive {
    entries: RwLock<Vec<SavedResume>>,
    queue: Arc<WriteQueue>,
}

impl ResumeArchive {
    /// Hydrates the collection, defaulting to empty on any read failure.
    pub async fn load(store: &dyn KeyValueStore, queue: Arc<WriteQueue>) -> Self {
        let entries: Vec<SavedResume> = storage::get_json(store, keys::SAVED, Vec::new()).await;
        ResumeArchive {
            entries: RwLock::new(entries),
            queue,
        }
    }

    /// All saved resumes, most recent first.
    pub async fn list(&self) -> Vec<SavedResume> {
        let mut entries = self.entries.read().await.clone();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    pub async fn get(&self, id: Uuid) -> Option<SavedResume> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// Wraps `draft` in a new snapshot with a fresh id and the current time,
    /// appends it, and schedules a persist of the whole collection.
    ///
    /// Enqueued under the write guard so queue order matches mutation order.
    pub async fn save(&self, mut draft: ResumeDraft) -> Result<SavedResume, StoreError> {
        draft.normalize();
        let entry = SavedResume {
            id: Uuid::new_v4(),
            data: draft,
            date: Utc::now(),
        };

        let mut entries = self.entries.write().await;
        entries.push(entry.clone());
        self.queue.enqueue(keys::SAVED, &*entries)?;
        drop(entries);
        info!(id = %entry.id, "resume saved");
        Ok(entry)
    }

    /// Removes the snapshot with `id` if present. Unknown ids are a no-op and
    /// skip the persist entirely.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.queue.enqueue(keys::SAVED, &*entries)?;
        drop(entries);
        info!(%id, "resume deleted");
        Ok(true)
    }
}
