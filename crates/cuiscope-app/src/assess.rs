//! The `assess` use case: run a session, evaluate, and produce a report.

use crate::providers::TracingProvider;
use crate::report::{AssessmentReport, build_report};
use cuiscope_domain::{Catalog, InputProvider};
use cuiscope_types::Subject;
use time::OffsetDateTime;

/// Input for the assess use case.
#[derive(Clone, Debug)]
pub struct AssessInput<'a> {
    /// Catalog with effective thresholds already applied.
    pub catalog: &'a Catalog,
    pub subject: Subject,
}

/// Output from the assess use case.
#[derive(Clone, Debug)]
pub struct AssessOutput {
    pub report: AssessmentReport,
    /// Questions the provider was asked for (retries not counted).
    pub asked: usize,
    /// Questions skipped because their dependency did not hold.
    pub skipped: usize,
}

/// Run one questionnaire session with `provider` and assess the answers.
///
/// A session failure is returned as a [`cuiscope_domain::SessionError`]
/// inside the `anyhow` error so callers can pick an exit code.
pub fn run_assess<P>(input: AssessInput<'_>, provider: P) -> anyhow::Result<AssessOutput>
where
    P: InputProvider,
{
    let started_at = OffsetDateTime::now_utc();
    let catalog = input.catalog;
    tracing::info!(
        catalog = catalog.id(),
        version = catalog.version(),
        questions = catalog.questions().len(),
        "session started"
    );

    let mut provider = TracingProvider::new(provider);
    let answers = match cuiscope_domain::run_session(catalog.questions(), &mut provider) {
        Ok(answers) => answers,
        Err(err) => {
            tracing::info!(question = err.question_id(), error = %err, "session ended without answers");
            return Err(err.into());
        }
    };
    tracing::info!(
        answered = answers.len(),
        skipped = provider.skipped_count(),
        "session finished"
    );

    let finished_at = OffsetDateTime::now_utc();
    let assessment = cuiscope_domain::assess(catalog, answers, finished_at);
    tracing::info!(
        boundary = assessment.scope.boundary.as_str(),
        required_level = ?assessment.scope.required_level,
        included = assessment.scope.included().count(),
        addressed = assessment.summary.addressed,
        partial = assessment.summary.partially_addressed,
        gaps = assessment.summary.not_addressed,
        advisories = assessment.advisories.len(),
        "assessment complete"
    );

    Ok(AssessOutput {
        asked: provider.asked(),
        skipped: provider.skipped_count(),
        report: build_report(assessment, input.subject, started_at, finished_at),
    })
}
