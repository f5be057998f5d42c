//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Kleene evaluation of `all` / `any`
//! - Coverage precedence and completeness
//! - Determinism, monotonicity and skip propagation of classification

use crate::answers::{Answer, AnswerSet};
use crate::assessment::assess;
use crate::catalog::{Catalog, CatalogParts};
use crate::classify::classify;
use crate::mapper::combine;
use crate::model::{BoundaryThresholds, ControlRule, Question, RuleStatus};
use crate::predicate::{EvalContext, Predicate, Truth};
use crate::session::run_session;
use crate::test_support::{ScriptedInput, category, control, module, scope_rule};
use cuiscope_types::{AnswerValue, BoundaryClass, CoverageStatus};
use proptest::prelude::*;
use std::collections::BTreeSet;
use time::OffsetDateTime;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

const MAX_QUESTIONS: usize = 8;

fn arb_rule_status() -> impl Strategy<Value = RuleStatus> {
    prop_oneof![
        Just(RuleStatus::Addressed),
        Just(RuleStatus::PartiallyAddressed),
        Just(RuleStatus::NotAddressed),
    ]
}

/// `None` = unanswered, `Some(b)` = answered with `b`.
fn arb_answers(n: usize) -> impl Strategy<Value = Vec<Option<bool>>> {
    prop::collection::vec(prop::option::of(any::<bool>()), n)
}

fn qid(i: usize) -> String {
    format!("q{i}")
}

fn answer_set(values: &[Option<bool>]) -> AnswerSet {
    AnswerSet::from_answers(
        values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|b| Answer::new(&qid(i), AnswerValue::Boolean(b)))),
    )
}

/// `n` boolean questions, one positive scope item per question spread over
/// three categories, one control per item gated on inclusion plus a
/// condition on the next question.
fn positive_catalog(n: usize) -> Catalog {
    let questions = (0..n)
        .map(|i| Question::boolean(&qid(i), "Q?"))
        .collect::<Vec<_>>();
    let categories = ["endpoint", "infrastructure", "cloud"];
    let scope_rules = (0..n)
        .map(|i| {
            scope_rule(
                &format!("item{i}"),
                categories[i % categories.len()],
                Predicate::is(&qid(i), true),
            )
        })
        .collect();
    let controls = (0..n).map(|i| control(&format!("C.{i}"))).collect();
    let control_rules = (0..n)
        .map(|i| ControlRule {
            control: format!("C.{i}"),
            applies_when: Some(Predicate::in_scope(&format!("item{i}"))),
            when: Some(Predicate::is(&qid((i + 1) % n), true)),
            then: RuleStatus::Addressed,
            otherwise: RuleStatus::NotAddressed,
            note: Some("gap".to_string()),
        })
        .collect();

    let parts = CatalogParts {
        id: "prop".to_string(),
        version: "1".to_string(),
        modules: vec![module("m", questions)],
        categories: categories
            .iter()
            .map(|c| category(c, false, None))
            .collect(),
        scope_rules,
        thresholds: BoundaryThresholds::default(),
        controls,
        control_rules,
        advisories: Vec::new(),
    };
    match Catalog::new(parts) {
        Ok(catalog) => catalog,
        Err(err) => panic!("generated catalog is invalid: {err}"),
    }
}

/// An `is true` atom over question `i` plus the answer giving it `truth`.
fn atom_with(truth: Truth, i: usize) -> (Predicate, Option<bool>) {
    let answer = match truth {
        Truth::True => Some(true),
        Truth::False => Some(false),
        Truth::Unknown => None,
    };
    (Predicate::is(&qid(i), true), answer)
}

fn arb_truths() -> impl Strategy<Value = Vec<Truth>> {
    prop::collection::vec(
        prop_oneof![Just(Truth::True), Just(Truth::False), Just(Truth::Unknown)],
        1..MAX_QUESTIONS,
    )
}

// ============================================================================
// Predicate properties
// ============================================================================

proptest! {
    #[test]
    fn all_follows_kleene_conjunction(truths in arb_truths()) {
        let (children, values): (Vec<_>, Vec<_>) =
            truths.iter().enumerate().map(|(i, t)| atom_with(*t, i)).unzip();
        let set = answer_set(&values);
        let got = Predicate::all(children).evaluate(&EvalContext::answers(&set));

        let expected = if truths.contains(&Truth::False) {
            Truth::False
        } else if truths.contains(&Truth::Unknown) {
            Truth::Unknown
        } else {
            Truth::True
        };
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn any_follows_kleene_disjunction(truths in arb_truths()) {
        let (children, values): (Vec<_>, Vec<_>) =
            truths.iter().enumerate().map(|(i, t)| atom_with(*t, i)).unzip();
        let set = answer_set(&values);
        let got = Predicate::any(children).evaluate(&EvalContext::answers(&set));

        let expected = if truths.contains(&Truth::True) {
            Truth::True
        } else if truths.contains(&Truth::Unknown) {
            Truth::Unknown
        } else {
            Truth::False
        };
        prop_assert_eq!(got, expected);
    }
}

// ============================================================================
// Coverage properties
// ============================================================================

proptest! {
    #[test]
    fn combine_is_order_independent(mut statuses in prop::collection::vec(arb_rule_status(), 0..10)) {
        let before = combine(&statuses);
        statuses.reverse();
        prop_assert_eq!(combine(&statuses), before);
    }

    #[test]
    fn not_addressed_dominates(statuses in prop::collection::vec(arb_rule_status(), 0..10)) {
        let mut with_gap = statuses.clone();
        with_gap.push(RuleStatus::NotAddressed);
        prop_assert_eq!(combine(&with_gap), CoverageStatus::NotAddressed);
    }

    #[test]
    fn coverage_has_one_entry_per_control(
        n in 1usize..MAX_QUESTIONS,
        values in arb_answers(MAX_QUESTIONS),
    ) {
        let catalog = positive_catalog(n);
        let set = answer_set(&values[..n]);
        let a = assess(&catalog, set, OffsetDateTime::UNIX_EPOCH);

        prop_assert_eq!(a.coverage.len(), n);
        for (entry, def) in a.coverage.entries().iter().zip(catalog.controls().controls()) {
            prop_assert_eq!(&entry.control_id, &def.id);
        }
        prop_assert_eq!(a.summary.total() as usize, n);
    }

    #[test]
    fn excluded_item_means_not_applicable(
        n in 1usize..MAX_QUESTIONS,
        values in arb_answers(MAX_QUESTIONS),
    ) {
        let catalog = positive_catalog(n);
        let set = answer_set(&values[..n]);
        let a = assess(&catalog, set, OffsetDateTime::UNIX_EPOCH);

        for i in 0..n {
            if !a.scope.is_included(&format!("item{i}")) {
                prop_assert_eq!(
                    a.coverage.status(&format!("C.{i}")),
                    Some(CoverageStatus::NotApplicable)
                );
            }
        }
    }
}

// ============================================================================
// Classification properties
// ============================================================================

proptest! {
    #[test]
    fn assessment_is_deterministic(
        n in 1usize..MAX_QUESTIONS,
        values in arb_answers(MAX_QUESTIONS),
    ) {
        let catalog = positive_catalog(n);
        let set = answer_set(&values[..n]);
        let first = serde_json::to_string(&assess(&catalog, set.clone(), OffsetDateTime::UNIX_EPOCH));
        let second = serde_json::to_string(&assess(&catalog, set, OffsetDateTime::UNIX_EPOCH));
        prop_assert_eq!(first.ok(), second.ok());
    }

    #[test]
    fn all_no_includes_nothing(n in 1usize..MAX_QUESTIONS) {
        let catalog = positive_catalog(n);
        let set = answer_set(&vec![Some(false); n]);
        let scope = classify(&set, catalog.scope_rules());
        prop_assert_eq!(scope.included().count(), 0);
        prop_assert_eq!(scope.boundary, BoundaryClass::Minimal);
    }

    #[test]
    fn flipping_no_to_yes_only_adds(
        n in 1usize..MAX_QUESTIONS,
        values in prop::collection::vec(any::<bool>(), MAX_QUESTIONS),
        flip in 0usize..MAX_QUESTIONS,
    ) {
        let flip = flip % n;
        let mut before: Vec<Option<bool>> = values[..n].iter().copied().map(Some).collect();
        before[flip] = Some(false);
        let mut after = before.clone();
        after[flip] = Some(true);

        let catalog = positive_catalog(n);
        let scope_before = classify(&answer_set(&before), catalog.scope_rules());
        let scope_after = classify(&answer_set(&after), catalog.scope_rules());

        let flipped = format!("item{flip}");
        prop_assert!(scope_after.is_included(&flipped));
        for item in scope_before.included() {
            prop_assert!(scope_after.is_included(&item.id));
        }

        // Every item has its own sole trigger, so nothing else comes in.
        let mut expected: BTreeSet<String> =
            scope_before.included().map(|i| i.id.clone()).collect();
        expected.insert(flipped);
        let actual: BTreeSet<String> = scope_after.included().map(|i| i.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn skipped_trigger_never_includes(
        gate in any::<bool>(),
        rest in prop::collection::vec(any::<bool>(), 2),
    ) {
        // q1 is asked only when q0 is yes; item1 is triggered solely by q1.
        let questions = vec![
            Question::boolean("q0", "Gate?"),
            Question::boolean("q1", "Follow-up?").depends_on(Predicate::is("q0", true)),
            Question::boolean("q2", "Other?"),
        ];
        let catalog_parts = CatalogParts {
            id: "skip".to_string(),
            version: "1".to_string(),
            modules: vec![module("m", questions)],
            categories: vec![category("endpoint", false, None)],
            scope_rules: vec![scope_rule("item1", "endpoint", Predicate::is("q1", true))],
            ..CatalogParts::default()
        };
        let catalog = match Catalog::new(catalog_parts) {
            Ok(c) => c,
            Err(err) => panic!("invalid: {err}"),
        };

        let mut inputs = vec![gate];
        inputs.extend(rest);
        let mut provider = ScriptedInput::values(inputs);
        let result = run_session(catalog.questions(), &mut provider);
        prop_assert!(result.is_ok());
        let answers = result.unwrap_or_default();

        if !gate {
            prop_assert!(!answers.contains("q1"));
            let scope = classify(&answers, catalog.scope_rules());
            prop_assert!(!scope.is_included("item1"));
        }
    }
}
