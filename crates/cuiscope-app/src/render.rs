//! Render use cases over saved or in-memory reports.

use crate::report::{AssessmentReport, to_renderable};

pub fn render_markdown(report: &AssessmentReport) -> String {
    cuiscope_render::render_markdown(&to_renderable(report))
}

pub fn render_summary(report: &AssessmentReport) -> String {
    cuiscope_render::render_summary(&to_renderable(report))
}
