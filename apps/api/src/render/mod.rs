pub mod handlers;
pub mod metrics;
pub mod template;

pub use metrics::{get_metrics, DocFont, FontMetricTable};
pub use template::{render, DocBlock, RenderedDocument};
