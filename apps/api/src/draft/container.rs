//! Draft state container.
//!
//! Holds the in-progress resume behind a lock. Mutations are whole-field
//! replacements: a patch carries only the top-level fields it wants to
//! replace, and list fields always replace the entire list (no partial-entry
//! edits bypass the owning list). Every successful mutation enqueues a
//! persist on the per-key write queue; callers observe persistence through
//! [`crate::storage::SyncStatus`] instead of awaiting the disk.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::resume::{
    BasicInfo, ColorScheme, EducationEntry, ExperienceEntry, ResumeDraft, SkillEntry,
};
use crate::models::template::TemplateId;
use crate::storage::{self, keys, KeyValueStore, StoreError, SyncStatus, WriteQueue};

/// A shallow partial update: only fields present in the JSON body replace the
/// corresponding draft fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftPatch {
    pub basic_info: Option<BasicInfo>,
    pub education: Option<Vec<EducationEntry>>,
    pub work_experience: Option<Vec<ExperienceEntry>>,
    pub skills: Option<Vec<SkillEntry>>,
    pub summary: Option<String>,
    pub color_scheme: Option<ColorScheme>,
    pub template: Option<TemplateId>,
}

impl DraftPatch {
    fn apply_to(self, draft: &mut ResumeDraft) {
        if let Some(v) = self.basic_info {
            draft.basic_info = v;
        }
        if let Some(v) = self.education {
            draft.education = v;
        }
        if let Some(v) = self.work_experience {
            draft.work_experience = v;
        }
        if let Some(v) = self.skills {
            draft.skills = v;
        }
        if let Some(v) = self.summary {
            draft.summary = Some(v);
        }
        if let Some(v) = self.color_scheme {
            draft.color_scheme = v;
        }
        if let Some(v) = self.template {
            draft.template = v;
        }
    }
}

pub struct DraftStore {
    draft: RwLock<ResumeDraft>,
    queue: Arc<WriteQueue>,
}

impl DraftStore {
    /// Hydrates the container from the store, defaulting to an empty draft on
    /// any read failure, and normalizes whatever was loaded.
    pub async fn load(store: &dyn KeyValueStore, queue: Arc<WriteQueue>) -> Self {
        let mut draft = storage::get_json(store, keys::DRAFT, ResumeDraft::default()).await;
        draft.normalize();
        DraftStore {
            draft: RwLock::new(draft),
            queue,
        }
    }

    /// Snapshot of the current draft.
    pub async fn get(&self) -> ResumeDraft {
        self.draft.read().await.clone()
    }

    /// Shallow-merges `patch` into the draft and schedules a persist.
    /// Returns the draft after the merge.
    ///
    /// The enqueue happens under the write guard: queue order must match
    /// mutation order, or a stale snapshot could be the one that lands on
    /// disk last.
    pub async fn update(&self, patch: DraftPatch) -> Result<ResumeDraft, StoreError> {
        let mut guard = self.draft.write().await;
        patch.apply_to(&mut guard);
        guard.normalize();
        let snapshot = guard.clone();
        self.queue.enqueue(keys::DRAFT, &snapshot)?;
        drop(guard);
        Ok(snapshot)
    }

    /// Replaces the whole draft (used when loading a saved resume for
    /// editing) and schedules a persist.
    pub async fn replace(&self, mut full: ResumeDraft) -> Result<ResumeDraft, StoreError> {
        full.normalize();
        let mut guard = self.draft.write().await;
        *guard = full.clone();
        self.queue.enqueue(keys::DRAFT, &full)?;
        drop(guard);
        Ok(full)
    }

    /// Resets to the empty shape and persists the cleared state.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let empty = ResumeDraft::default();
        let mut guard = self.draft.write().await;
        *guard = empty.clone();
        self.queue.enqueue(keys::DRAFT, &empty)?;
        drop(guard);
        info!("draft cleared");
        Ok(())
    }

    /// Persistence status for the draft key.
    pub fn sync_status(&self) -> SyncStatus {
        self.queue.status(keys::DRAFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::SkillLevel;
    use crate::storage::FileStore;

    async fn make_container() -> (
        tempfile::TempDir,
        Arc<dyn KeyValueStore>,
        Arc<WriteQueue>,
        DraftStore,
    ) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(dir.path()).await.expect("open store"));
        let queue = Arc::new(WriteQueue::new(Arc::clone(&store)));
        let drafts = DraftStore::load(store.as_ref(), Arc::clone(&queue)).await;
        (dir, store, queue, drafts)
    }

    fn basic_info_patch(first: &str) -> DraftPatch {
        DraftPatch {
            basic_info: Some(BasicInfo {
                first_name: Some(first.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_sequence_equals_shallow_merge_in_call_order() {
        let (_dir, _store, _queue, drafts) = make_container().await;

        drafts.update(basic_info_patch("Ada")).await.expect("update");
        drafts
            .update(DraftPatch {
                summary: Some("Engineer.".to_string()),
                ..Default::default()
            })
            .await
            .expect("update");
        drafts
            .update(basic_info_patch("Grace"))
            .await
            .expect("update");

        let draft = drafts.get().await;
        // Later basicInfo patch replaces the whole field; the summary patch
        // from between is untouched.
        assert_eq!(draft.basic_info.first_name.as_deref(), Some("Grace"));
        assert_eq!(draft.summary.as_deref(), Some("Engineer."));
    }

    #[tokio::test]
    async fn test_patch_replaces_whole_list() {
        let (_dir, _store, _queue, drafts) = make_container().await;

        let first = SkillEntry {
            name: "Rust".to_string(),
            level: SkillLevel::Expert,
            ..Default::default()
        };
        drafts
            .update(DraftPatch {
                skills: Some(vec![first.clone()]),
                ..Default::default()
            })
            .await
            .expect("update");

        let replacement = SkillEntry {
            name: "Go".to_string(),
            ..Default::default()
        };
        drafts
            .update(DraftPatch {
                skills: Some(vec![replacement.clone()]),
                ..Default::default()
            })
            .await
            .expect("update");

        let draft = drafts.get().await;
        assert_eq!(draft.skills, vec![replacement]);
    }

    #[tokio::test]
    async fn test_update_normalizes_current_entries() {
        let (_dir, _store, _queue, drafts) = make_container().await;

        drafts
            .update(DraftPatch {
                work_experience: Some(vec![ExperienceEntry {
                    is_current_job: true,
                    end_date: Some("2025-01".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            })
            .await
            .expect("update");

        let draft = drafts.get().await;
        assert_eq!(draft.work_experience[0].end_date, None);
    }

    #[tokio::test]
    async fn test_concurrent_updates_keep_disk_and_memory_in_agreement() {
        let (_dir, store, queue, drafts) = make_container().await;
        let drafts = Arc::new(drafts);

        for round in 0..100 {
            let mut tasks = Vec::new();
            for i in 0..8 {
                let drafts = Arc::clone(&drafts);
                tasks.push(tokio::spawn(async move {
                    drafts
                        .update(basic_info_patch(&format!("name-{i}")))
                        .await
                }));
            }
            for task in tasks {
                task.await.expect("join").expect("update");
            }
            queue.flush().await;

            let raw = store
                .get_raw(keys::DRAFT)
                .await
                .expect("get")
                .expect("draft persisted");
            let persisted: ResumeDraft = serde_json::from_str(&raw).expect("parse");
            assert_eq!(
                persisted,
                drafts.get().await,
                "round {round}: persisted draft diverged from memory"
            );
        }
    }

    #[tokio::test]
    async fn test_clear_resets_and_persists_empty_shape() {
        let (_dir, store, queue, drafts) = make_container().await;

        drafts.update(basic_info_patch("Ada")).await.expect("update");
        drafts.clear().await.expect("clear");
        queue.flush().await;

        let raw = store
            .get_raw(keys::DRAFT)
            .await
            .expect("get")
            .expect("cleared draft must still be persisted");
        let persisted: ResumeDraft = serde_json::from_str(&raw).expect("parse");
        assert_eq!(persisted, ResumeDraft::default());
        assert_eq!(drafts.get().await, ResumeDraft::default());
        assert_eq!(drafts.sync_status(), SyncStatus::Synced);
    }

    #[tokio::test]
    async fn test_replace_loads_full_draft() {
        let (_dir, _store, _queue, drafts) = make_container().await;

        let mut incoming = ResumeDraft::default();
        incoming.basic_info.first_name = Some("Lin".to_string());
        incoming.template = TemplateId::Classic;

        let result = drafts.replace(incoming.clone()).await.expect("replace");
        assert_eq!(result, incoming);
        assert_eq!(drafts.get().await, incoming);
    }

    #[tokio::test]
    async fn test_hydrates_from_persisted_draft() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(dir.path()).await.expect("open store"));

        let mut persisted = ResumeDraft::default();
        persisted.basic_info.last_name = Some("Hopper".to_string());
        storage::set_json(store.as_ref(), keys::DRAFT, &persisted)
            .await
            .expect("seed");

        let queue = Arc::new(WriteQueue::new(Arc::clone(&store)));
        let drafts = DraftStore::load(store.as_ref(), queue).await;
        assert_eq!(
            drafts.get().await.basic_info.last_name.as_deref(),
            Some("Hopper")
        );
    }
}
