use crate::markdown::status_label;
use crate::model::{boundary_label, level_label};
use crate::{RenderableReport, RenderableStatus};

/// Plain-text summary for the terminal.
pub fn render_summary(report: &RenderableReport) -> String {
    let mut out = String::new();
    let c = report.counts;

    out.push_str("SCOPING ASSESSMENT RESULTS\n");
    if let Some(org) = &report.subject.organization {
        out.push_str(&format!("  Organization:          {org}\n"));
    }
    out.push_str(&format!(
        "  Boundary:              {}\n",
        boundary_label(report.boundary)
    ));
    out.push_str(&format!(
        "  CMMC level required:   {}\n",
        level_label(report.required_level)
    ));
    out.push_str(&format!(
        "  Items in scope:        {} of {}\n",
        report.included_items().count(),
        report.items.len()
    ));
    out.push_str(&format!(
        "  Controls:              {} addressed, {} partial, {} gaps, {} n/a\n",
        c.addressed, c.partial, c.gap, c.not_applicable
    ));

    let open: Vec<_> = report
        .controls
        .iter()
        .filter(|c| matches!(c.status, RenderableStatus::Gap | RenderableStatus::Partial))
        .collect();
    if !open.is_empty() {
        out.push_str("\nOpen controls:\n");
        for control in open {
            out.push_str(&format!(
                "  [{}] {}  {}\n",
                status_label(control.status),
                control.control_id,
                control.title
            ));
        }
    }

    if !report.advisories.is_empty() {
        out.push_str("\nAdvisories:\n");
        for advisory in &report.advisories {
            out.push_str(&format!("  ! {}\n", advisory.message));
        }
    }

    out
}
