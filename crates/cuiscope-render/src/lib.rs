//! Rendering utilities for scoping reports (Markdown, terminal summary).

#![forbid(unsafe_code)]

mod markdown;
mod model;
mod summary;

pub use markdown::render_markdown;
pub use model::{
    RenderableAdvisory, RenderableBoundary, RenderableControl, RenderableCounts,
    RenderableItem, RenderableReport, RenderableStatus, RenderableSubject,
};
pub use summary::render_summary;
