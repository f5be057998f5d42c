//! Pure scoping evaluation (no IO).
//!
//! Input: a validated catalog and answers collected through an input
//! provider.
//! Output: scope determination, control coverage and the assessment that
//! wraps them.

#![forbid(unsafe_code)]

pub mod answers;
pub mod assessment;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod fingerprint;
pub mod mapper;
pub mod model;
pub mod predicate;
pub mod session;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use answers::{Answer, AnswerSet};
pub use assessment::{Advisory, Assessment, CatalogRef, assess};
pub use catalog::{Catalog, CatalogParts, ControlCatalog, QuestionCatalog, ScopeRules};
pub use classify::{ScopeDetermination, ScopeItem, classify};
pub use error::{CatalogError, SessionError, ValidationError, ValidationReason};
pub use mapper::{ControlCoverage, CoverageCounts, CoverageEntry, map_controls};
pub use session::{Input, InputProvider, OnInvalid, run_session};
