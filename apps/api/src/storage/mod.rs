pub mod queue;
pub mod store;

pub use queue::{SyncStatus, WriteQueue};
pub use store::{get_json, set_json, FileStore, KeyValueStore, StoreError};

/// Storage keys for the persisted state layout. One JSON document per key.
pub mod keys {
    /// The resume currently being edited.
    pub const DRAFT: &str = "resume_draft";
    /// Array of finalized resume snapshots.
    pub const SAVED: &str = "saved_resumes";
    /// UI theme preference string.
    pub const THEME: &str = "theme_preference";
    /// UI language preference string.
    pub const LANGUAGE: &str = "language_preference";
}
