use crate::model::{boundary_label, level_label};
use crate::{RenderableReport, RenderableStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# CMMC scoping report\n\n");

    let subject = &report.subject;
    for (label, value) in [
        ("Organization", &subject.organization),
        ("Assessor", &subject.assessor),
        ("CAGE code", &subject.cage_code),
        ("Contract", &subject.contract_ref),
    ] {
        if let Some(v) = value {
            out.push_str(&format!("- {label}: {v}\n"));
        }
    }
    out.push_str(&format!(
        "- Catalog: `{}` ({})\n- Generated: {}\n- Answers: {} (fingerprint `{}`)\n\n",
        report.catalog_id,
        report.catalog_version,
        report.created_at,
        report.answered,
        short_fingerprint(&report.fingerprint)
    ));

    out.push_str("## Scope\n\n");
    out.push_str(&format!(
        "- Boundary: **{}**\n- CMMC level required: **{}**\n- Items in scope: {} of {}\n\n",
        boundary_label(report.boundary).to_uppercase(),
        level_label(report.required_level),
        report.included_items().count(),
        report.items.len()
    ));

    if report.included_items().next().is_none() {
        out.push_str("No items are in scope.\n\n");
    } else {
        out.push_str("| Item | Category | Based on |\n|---|---|---|\n");
        for item in report.included_items() {
            out.push_str(&format!(
                "| {} (`{}`) | {} | {} |\n",
                cell(&item.title),
                item.id,
                cell(&item.category),
                codes(&item.rationale)
            ));
        }
        out.push('\n');
    }

    let excluded: Vec<_> = report.items.iter().filter(|i| !i.included).collect();
    if !excluded.is_empty() {
        out.push_str("### Out of scope\n\n");
        for item in excluded {
            out.push_str(&format!("- {} (`{}`)\n", item.title, item.id));
        }
        out.push('\n');
    }

    out.push_str("## Control coverage\n\n");
    let c = report.counts;
    out.push_str(&format!(
        "- Addressed: {}\n- Partially addressed: {}\n- Not addressed: {}\n- Not applicable: {}\n\n",
        c.addressed, c.partial, c.gap, c.not_applicable
    ));

    if !report.controls.is_empty() {
        out.push_str("| Control | Family | Status | Based on | Notes |\n|---|---|---|---|---|\n");
        for control in &report.controls {
            let basis: Vec<String> = control
                .answers
                .iter()
                .chain(&control.scope_items)
                .cloned()
                .collect();
            out.push_str(&format!(
                "| `{}` {} | {} | {} | {} | {} |\n",
                control.control_id,
                cell(&control.title),
                cell(&control.family),
                status_label(control.status),
                codes(&basis),
                control
                    .notes
                    .iter()
                    .map(|n| cell(n))
                    .collect::<Vec<_>>()
                    .join("<br>")
            ));
        }
        out.push('\n');
    }

    if !report.advisories.is_empty() {
        out.push_str("## Advisories\n\n");
        for advisory in &report.advisories {
            out.push_str(&format!("- **{}**: {}\n", advisory.id, advisory.message));
        }
    }

    out
}

pub(crate) fn status_label(status: RenderableStatus) -> &'static str {
    match status {
        RenderableStatus::Addressed => "ADDRESSED",
        RenderableStatus::Partial => "PARTIAL",
        RenderableStatus::Gap => "GAP",
        RenderableStatus::NotApplicable => "N/A",
    }
}

fn short_fingerprint(fp: &str) -> &str {
    fp.get(..12).unwrap_or(fp)
}

/// Escape a value for a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn codes(ids: &[String]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(|id| format!("`{id}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
