pub mod pdf;

pub use pdf::{export_filename, export_pdf, page_count, ExportError};
