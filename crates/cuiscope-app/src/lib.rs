//! Use case orchestration for cuiscope.
//!
//! This crate provides the application layer: use cases that coordinate the domain, settings, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod answers;
mod assess;
mod catalog;
mod exit;
mod explain;
mod prompt;
mod providers;
mod render;
mod report;

pub use answers::{AnswerFile, export_answers, parse_answers_json, serialize_answer_file};
pub use assess::{AssessInput, AssessOutput, run_assess};
pub use catalog::{CatalogSource, describe_catalog, load_catalog, resolve_settings};
pub use exit::{
    EXIT_ABORTED, EXIT_ERROR, EXIT_INCOMPLETE, EXIT_OK, error_exit_code,
};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use prompt::{InteractiveProvider, interpret_line, prompt_subject};
pub use providers::{ChainProvider, ReplayProvider, SequenceProvider, TracingProvider};
pub use render::{render_markdown, render_summary};
pub use report::{
    AssessmentReport, build_report, parse_report_json, serialize_report, to_renderable,
};
