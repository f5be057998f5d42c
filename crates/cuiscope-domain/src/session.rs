//! The questionnaire engine.

use crate::answers::{Answer, AnswerSet};
use crate::catalog::QuestionCatalog;
use crate::error::{SessionError, ValidationError};
use crate::model::{Question, QuestionModule};
use cuiscope_types::{AnswerValue, RawAnswer};

/// What a provider hands back when asked for a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Value(RawAnswer),
    /// No more input is available.
    EndOfInput,
    /// The user asked to stop.
    Abort,
}

/// How the engine should react to an invalid value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnInvalid {
    /// Ask the provider again for the same question.
    Resolicit,
    /// Fail the session with the validation error.
    Reject,
}

/// Source of answers for a session.
pub trait InputProvider {
    /// Called before the first question of each module is considered.
    fn begin_module(&mut self, _module: &QuestionModule) {}

    /// Called for a question whose dependency did not hold.
    fn skipped(&mut self, _question: &Question) {}

    fn next_value(&mut self, question: &Question, answers: &AnswerSet) -> Input;

    fn on_invalid(&mut self, _question: &Question, _error: &ValidationError) -> OnInvalid {
        OnInvalid::Reject
    }
}

impl<P: InputProvider + ?Sized> InputProvider for &mut P {
    fn begin_module(&mut self, module: &QuestionModule) {
        (**self).begin_module(module)
    }

    fn skipped(&mut self, question: &Question) {
        (**self).skipped(question)
    }

    fn next_value(&mut self, question: &Question, answers: &AnswerSet) -> Input {
        (**self).next_value(question, answers)
    }

    fn on_invalid(&mut self, question: &Question, error: &ValidationError) -> OnInvalid {
        (**self).on_invalid(question, error)
    }
}

/// Run one session over the catalog.
///
/// Questions are visited in module then declaration order. A question is
/// asked only when its dependency evaluates to true against the answers
/// collected so far. Partial answers are discarded on any error.
pub fn run_session<P>(catalog: &QuestionCatalog, provider: &mut P) -> Result<AnswerSet, SessionError>
where
    P: InputProvider + ?Sized,
{
    let mut answers = AnswerSet::default();

    for module in catalog.modules() {
        provider.begin_module(module);
        for question in &module.questions {
            if !question.is_enabled(&answers) {
                provider.skipped(question);
                continue;
            }
            let value = solicit(question, &answers, provider)?;
            answers.insert(Answer {
                question_id: question.id.clone(),
                value,
            });
        }
    }

    Ok(answers)
}

fn solicit<P>(
    question: &Question,
    answers: &AnswerSet,
    provider: &mut P,
) -> Result<AnswerValue, SessionError>
where
    P: InputProvider + ?Sized,
{
    loop {
        match provider.next_value(question, answers) {
            Input::Value(raw) => match question.accept(&raw) {
                Ok(value) => return Ok(value),
                Err(err) => match provider.on_invalid(question, &err) {
                    OnInvalid::Resolicit => continue,
                    OnInvalid::Reject => return Err(err.into()),
                },
            },
            Input::EndOfInput => {
                return Err(SessionError::Incomplete {
                    question_id: question.id.clone(),
                    answered: answers.len(),
                });
            }
            Input::Abort => {
                return Err(SessionError::Aborted {
                    question_id: question.id.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::ValidationReason;
    use crate::predicate::Predicate;
    use crate::test_support::{ScriptedInput, five_question_parts, workstation_catalog};

    fn five_question_catalog() -> Catalog {
        Catalog::new(five_question_parts()).expect("valid")
    }

    #[test]
    fn collects_every_enabled_question() {
        let catalog = five_question_catalog();
        let mut input = ScriptedInput::values([true, true, true, true, true]);
        let answers = run_session(catalog.questions(), &mut input).expect("session");
        assert_eq!(answers.len(), 5);
        assert!(input.is_drained());
    }

    #[test]
    fn ending_after_two_of_five_is_incomplete() {
        let catalog = five_question_catalog();
        let mut input = ScriptedInput::values([true, true]);
        let err = run_session(catalog.questions(), &mut input).unwrap_err();
        assert_eq!(
            err,
            SessionError::Incomplete {
                question_id: "q3".to_string(),
                answered: 2
            }
        );
    }

    #[test]
    fn skipped_question_gets_no_answer_and_is_not_solicited() {
        let mut parts = five_question_parts();
        parts.modules[0].questions[1] =
            parts.modules[0].questions[1].clone().depends_on(Predicate::is("q1", true));
        let catalog = Catalog::new(parts).expect("valid");

        // q1 = no, so q2 is skipped; only four values are consumed.
        let mut input = ScriptedInput::values([false, true, true, true]);
        let answers = run_session(catalog.questions(), &mut input).expect("session");
        assert!(!answers.contains("q2"));
        assert_eq!(answers.len(), 4);
        assert_eq!(input.skipped_ids(), &["q2".to_string()]);
    }

    #[test]
    fn abort_discards_partial_answers() {
        let catalog = five_question_catalog();
        let mut input = ScriptedInput::new(vec![
            Input::Value(RawAnswer::Bool(true)),
            Input::Abort,
        ]);
        let err = run_session(catalog.questions(), &mut input).unwrap_err();
        assert_eq!(
            err,
            SessionError::Aborted {
                question_id: "q2".to_string()
            }
        );
    }

    #[test]
    fn invalid_value_is_rejected_by_default() {
        let catalog = workstation_catalog();
        let mut input = ScriptedInput::new(vec![Input::Value(RawAnswer::Text("perhaps".into()))]);
        let err = run_session(catalog.questions(), &mut input).unwrap_err();
        match err {
            SessionError::Validation(v) => {
                assert_eq!(v.question_id, "ws_cui");
                assert_eq!(
                    v.reason,
                    ValidationReason::WrongType {
                        expected: "boolean"
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn resolicit_asks_again_without_advancing() {
        let catalog = workstation_catalog();
        let mut input = ScriptedInput::new(vec![
            Input::Value(RawAnswer::Text("perhaps".into())),
            Input::Value(RawAnswer::Bool(true)),
        ])
        .resolicit();
        let answers = run_session(catalog.questions(), &mut input).expect("session");
        assert_eq!(answers.get("ws_cui"), Some(&AnswerValue::Boolean(true)));
        assert_eq!(input.invalid_count(), 1);
    }

    #[test]
    fn modules_are_announced_in_order() {
        let catalog = five_question_catalog();
        let mut input = ScriptedInput::values([true, true, true, true, true]);
        run_session(catalog.questions(), &mut input).expect("session");
        assert_eq!(input.modules(), &["first".to_string(), "second".to_string()]);
    }
}
