//! The `explain` use case: look up control guidance.

use cuiscope_domain::Catalog;
use cuiscope_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the control.
    Found {
        explanation: Explanation,
        /// `(question id, text)` of catalog questions that inform the control.
        questions: Vec<(String, String)>,
    },
    /// Unknown identifier; includes the known control ids.
    NotFound {
        identifier: String,
        available_control_ids: &'static [&'static str],
    },
}

/// Look up an explanation for a control id.
pub fn run_explain(identifier: &str, catalog: &Catalog) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(explanation) => {
            let questions = catalog
                .questions()
                .questions()
                .filter(|q| q.controls.iter().any(|c| c == explanation.control_id))
                .map(|q| (q.id.clone(), q.text.clone()))
                .collect();
            ExplainOutput::Found {
                explanation,
                questions,
            }
        }
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_control_ids: explain::all_control_ids(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation, questions: &[(String, String)]) -> String {
    let heading = format!("{} {}", exp.control_id, exp.title);
    let mut out = String::new();

    out.push_str(&heading);
    out.push('\n');
    out.push_str(&"=".repeat(heading.chars().count()));
    out.push_str("\n\n");
    out.push_str(&format!("Family: {}\n\n", exp.family));
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Evidence\n");
    out.push_str("--------\n");
    for item in exp.evidence {
        out.push_str(&format!("  - {item}\n"));
    }

    if !questions.is_empty() {
        out.push_str("\nInformed by\n");
        out.push_str("-----------\n");
        for (id, text) in questions {
            out.push_str(&format!("  {id}: {text}\n"));
        }
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, control_ids: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown control: {identifier}\n\n"));
    out.push_str("Available controls:\n");
    for id in control_ids {
        out.push_str(&format!("  - {id}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        cuiscope_settings::builtin_catalog().expect("built-in catalog")
    }

    #[test]
    fn explain_known_control() {
        let output = run_explain("ia.3.083", &catalog());
        let (exp, questions) = unwrap_found(output);
        assert_eq!(exp.control_id, "IA.3.083");
        let ids: Vec<&str> = questions.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["ac_02", "ac_04"]);
    }

    #[test]
    fn explain_unknown() {
        let output = run_explain("XX.9.999", &catalog());
        match output {
            ExplainOutput::NotFound {
                identifier,
                available_control_ids,
            } => {
                assert_eq!(identifier, "XX.9.999");
                assert_eq!(available_control_ids.len(), 15);
            }
            _ => panic!("expected NotFound"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let (exp, questions) = unwrap_found(run_explain("SC.3.177", &catalog()));
        let formatted = format_explanation(&exp, &questions);
        assert!(formatted.starts_with("SC.3.177 "));
        assert!(formatted.contains("Remediation\n-----------\n"));
        assert!(formatted.contains("Evidence\n"));
        assert!(formatted.contains("Informed by\n"));
        assert!(formatted.contains("  df_06: Is CUI encrypted at rest (when stored)?"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["AC.1.001", "AC.1.002"]);
        assert!(formatted.contains("Unknown control: missing"));
        assert!(formatted.contains("Available controls:"));
        assert!(formatted.contains("  - AC.1.002"));
    }

    fn unwrap_found(output: ExplainOutput) -> (Explanation, Vec<(String, String)>) {
        match output {
            ExplainOutput::Found {
                explanation,
                questions,
            } => (explanation, questions),
            _ => panic!("expected Found"),
        }
    }
}
