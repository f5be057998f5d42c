use anyhow::Context;
use cuiscope_domain::Assessment;
use cuiscope_render::{
    RenderableAdvisory, RenderableBoundary, RenderableControl, RenderableCounts, RenderableItem,
    RenderableReport, RenderableStatus, RenderableSubject,
};
use cuiscope_types::{
    BoundaryClass, CoverageStatus, ReportEnvelope, RunMeta, SCHEMA_ASSESSMENT_V1, Subject,
    ToolMeta,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// `cuiscope.assessment.v1`: the assessment wrapped in the report envelope.
pub type AssessmentReport = ReportEnvelope<Assessment>;

pub fn build_report(
    assessment: Assessment,
    subject: Subject,
    started_at: OffsetDateTime,
    finished_at: OffsetDateTime,
) -> AssessmentReport {
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;
    ReportEnvelope {
        schema: SCHEMA_ASSESSMENT_V1.to_string(),
        tool: ToolMeta {
            name: "cuiscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        run: RunMeta {
            started_at,
            ended_at: Some(finished_at),
            duration_ms: Some(duration_ms),
        },
        subject,
        data: assessment,
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<AssessmentReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_ASSESSMENT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_ASSESSMENT_V1})");
    }

    serde_json::from_value(value).context("parse assessment report")
}

pub fn serialize_report(report: &AssessmentReport) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

pub fn to_renderable(report: &AssessmentReport) -> RenderableReport {
    let a = &report.data;
    let summary = a.summary;

    RenderableReport {
        catalog_id: a.catalog.id.clone(),
        catalog_version: a.catalog.version.clone(),
        created_at: a
            .created_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| a.created_at.to_string()),
        subject: RenderableSubject {
            organization: report.subject.organization.clone(),
            assessor: report.subject.assessor.clone(),
            cage_code: report.subject.cage_code.clone(),
            contract_ref: report.subject.contract_ref.clone(),
        },
        answered: a.answers.len(),
        fingerprint: a.answers_fingerprint.clone(),
        boundary: match a.scope.boundary {
            BoundaryClass::Minimal => RenderableBoundary::Minimal,
            BoundaryClass::Moderate => RenderableBoundary::Moderate,
            BoundaryClass::Extensive => RenderableBoundary::Extensive,
        },
        required_level: a.scope.required_level,
        items: a
            .scope
            .items
            .iter()
            .map(|item| RenderableItem {
                id: item.id.clone(),
                title: item.title.clone(),
                category: item.category.clone(),
                included: item.included,
                rationale: item.rationale.clone(),
            })
            .collect(),
        controls: a
            .coverage
            .entries()
            .iter()
            .map(|entry| RenderableControl {
                control_id: entry.control_id.clone(),
                title: entry.title.clone(),
                family: entry.family.clone(),
                status: renderable_status(entry.status),
                answers: entry.answers.clone(),
                scope_items: entry.scope_items.clone(),
                notes: entry.notes.clone(),
            })
            .collect(),
        counts: RenderableCounts {
            addressed: summary.addressed,
            partial: summary.partially_addressed,
            gap: summary.not_addressed,
            not_applicable: summary.not_applicable,
        },
        advisories: a
            .advisories
            .iter()
            .map(|adv| RenderableAdvisory {
                id: adv.id.clone(),
                message: adv.message.clone(),
            })
            .collect(),
    }
}

fn renderable_status(status: CoverageStatus) -> RenderableStatus {
    match status {
        CoverageStatus::Addressed => RenderableStatus::Addressed,
        CoverageStatus::PartiallyAddressed => RenderableStatus::Partial,
        CoverageStatus::NotAddressed => RenderableStatus::Gap,
        CoverageStatus::NotApplicable => RenderableStatus::NotApplicable,
    }
}
