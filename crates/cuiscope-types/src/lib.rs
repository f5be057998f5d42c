//! Stable DTOs and IDs used across the cuiscope workspace.
//!
//! This crate is intentionally boring:
//! - answer values as they cross the input and output boundaries
//! - coverage and boundary status enums
//! - the versioned report envelope
//! - stable schema and control IDs
//! - explain registry for control guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;
pub mod value;

pub use explain::{Explanation, lookup_explanation};
pub use receipt::{
    BoundaryClass, CoverageStatus, ReportEnvelope, RunMeta, SCHEMA_ANSWERS_V1,
    SCHEMA_ASSESSMENT_V1, SCHEMA_CATALOG_V1, SCHEMA_CONFIG_V1, Subject, ToolMeta,
};
pub use value::{AnswerValue, RawAnswer};
