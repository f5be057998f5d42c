//! Non-interactive input providers and provider adapters.

use crate::answers::AnswerFile;
use cuiscope_domain::model::{Question, QuestionModule};
use cuiscope_domain::{AnswerSet, Input, InputProvider, OnInvalid, ValidationError};
use cuiscope_types::RawAnswer;
use std::collections::{BTreeMap, VecDeque};

/// Replays an answer file by question id.
///
/// A question without an entry ends the input. Each entry is handed out
/// once, so a re-solicit after an invalid value also ends the input.
#[derive(Clone, Debug, Default)]
pub struct ReplayProvider {
    answers: BTreeMap<String, RawAnswer>,
}

impl ReplayProvider {
    pub fn new(file: AnswerFile) -> Self {
        Self {
            answers: file.answers,
        }
    }

    /// Entries that no asked question consumed.
    pub fn unused(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }
}

impl InputProvider for ReplayProvider {
    fn next_value(&mut self, question: &Question, _answers: &AnswerSet) -> Input {
        match self.answers.remove(&question.id) {
            Some(raw) => {
                tracing::trace!(question = %question.id, value = %raw, "replayed answer");
                Input::Value(raw)
            }
            None => Input::EndOfInput,
        }
    }
}

/// Hands out values in order regardless of question id.
#[derive(Clone, Debug, Default)]
pub struct SequenceProvider {
    values: VecDeque<RawAnswer>,
}

impl SequenceProvider {
    pub fn new(values: impl IntoIterator<Item = RawAnswer>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl InputProvider for SequenceProvider {
    fn next_value(&mut self, _question: &Question, _answers: &AnswerSet) -> Input {
        match self.values.pop_front() {
            Some(raw) => Input::Value(raw),
            None => Input::EndOfInput,
        }
    }
}

/// Asks `primary` first and falls back to `secondary` once it runs out for a
/// question. Used to resume: replay a saved file, then prompt.
///
/// An invalid value from `primary` is dropped and the question goes to
/// `secondary`.
pub struct ChainProvider<A, B> {
    primary: A,
    secondary: B,
    last_from_primary: bool,
    resumed_from: Option<String>,
}

impl<A, B> ChainProvider<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self {
            primary,
            secondary,
            last_from_primary: false,
            resumed_from: None,
        }
    }

    /// First question answered by `secondary`, if any.
    pub fn resumed_from(&self) -> Option<&str> {
        self.resumed_from.as_deref()
    }

    pub fn into_inner(self) -> (A, B) {
        (self.primary, self.secondary)
    }
}

impl<A, B> InputProvider for ChainProvider<A, B>
where
    A: InputProvider,
    B: InputProvider,
{
    fn begin_module(&mut self, module: &QuestionModule) {
        self.primary.begin_module(module);
        self.secondary.begin_module(module);
    }

    fn skipped(&mut self, question: &Question) {
        self.primary.skipped(question);
        self.secondary.skipped(question);
    }

    fn next_value(&mut self, question: &Question, answers: &AnswerSet) -> Input {
        match self.primary.next_value(question, answers) {
            Input::EndOfInput => {
                self.last_from_primary = false;
                if self.resumed_from.is_none() {
                    tracing::info!(question = %question.id, "resuming interactively");
                    self.resumed_from = Some(question.id.clone());
                }
                self.secondary.next_value(question, answers)
            }
            other => {
                self.last_from_primary = true;
                other
            }
        }
    }

    fn on_invalid(&mut self, question: &Question, error: &ValidationError) -> OnInvalid {
        if self.last_from_primary {
            tracing::warn!(question = %question.id, error = %error, "discarding saved answer");
            OnInvalid::Resolicit
        } else {
            self.secondary.on_invalid(question, error)
        }
    }
}

/// Logs session progress and delegates to the wrapped provider.
pub struct TracingProvider<P> {
    inner: P,
    asked: usize,
    skipped: usize,
}

impl<P> TracingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            asked: 0,
            skipped: 0,
        }
    }

    pub fn asked(&self) -> usize {
        self.asked
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: InputProvider> InputProvider for TracingProvider<P> {
    fn begin_module(&mut self, module: &QuestionModule) {
        tracing::debug!(
            module = %module.id,
            questions = module.questions.len(),
            "begin module"
        );
        self.inner.begin_module(module);
    }

    fn skipped(&mut self, question: &Question) {
        tracing::debug!(question = %question.id, "skipped (dependency not met)");
        self.skipped += 1;
        self.inner.skipped(question);
    }

    fn next_value(&mut self, question: &Question, answers: &AnswerSet) -> Input {
        self.asked += 1;
        self.inner.next_value(question, answers)
    }

    fn on_invalid(&mut self, question: &Question, error: &ValidationError) -> OnInvalid {
        tracing::debug!(question = %question.id, error = %error, "invalid answer");
        self.inner.on_invalid(question, error)
    }
}
