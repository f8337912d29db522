pub mod container;
pub mod handlers;
pub mod validation;

pub use container::{DraftPatch, DraftStore};
