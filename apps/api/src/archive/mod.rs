pub mod collection;
pub mod handlers;

pub use collection::ResumeArchive;
