//! Interactive terminal prompt.

use cuiscope_domain::model::{AnswerType, Question, QuestionModule};
use cuiscope_domain::{AnswerSet, Input, InputProvider, OnInvalid, ValidationError};
use cuiscope_types::{RawAnswer, Subject};
use std::io::{self, BufRead, Write};

const ABORT: &str = ":q";

/// Interpret one line of terminal input for `question`.
///
/// Choice questions accept either the 1-based number of a value or the value
/// itself; multi-choice accepts a comma-separated list or `all`. Validation
/// happens later in the engine, so anything unrecognized is passed through
/// as text.
pub fn interpret_line(question: &Question, line: &str) -> Input {
    let line = line.trim();
    if line == ABORT {
        return Input::Abort;
    }

    let raw = match &question.answer_type {
        AnswerType::Boolean | AnswerType::Number { .. } => RawAnswer::Text(line.to_string()),
        AnswerType::SingleChoice { values } | AnswerType::FreeText { values } => {
            RawAnswer::Text(select(values, line).unwrap_or(line).to_string())
        }
        AnswerType::MultiChoice { values } => {
            if line.eq_ignore_ascii_case("all") {
                RawAnswer::List(values.clone())
            } else {
                RawAnswer::List(
                    line.split(',')
                        .map(str::trim)
                        .map(|part| select(values, part).unwrap_or(part).to_string())
                        .collect(),
                )
            }
        }
    };
    Input::Value(raw)
}

fn select<'a>(values: &'a [String], token: &str) -> Option<&'a str> {
    let n: usize = token.parse().ok()?;
    values.get(n.checked_sub(1)?).map(String::as_str)
}

/// Prompts on a line-oriented terminal.
///
/// `:q` or end of input aborts the session.
pub struct InteractiveProvider<R, W> {
    input: R,
    output: W,
    shown: usize,
    reprompt: bool,
}

impl<R: BufRead, W: Write> InteractiveProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            shown: 0,
            reprompt: false,
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn show_question(&mut self, question: &Question) -> io::Result<()> {
        self.shown += 1;
        let critical = if question.critical { " [CRITICAL]" } else { "" };
        writeln!(self.output, "  Q{}:{critical}", self.shown)?;
        writeln!(self.output, "  {}", question.text)?;
        if let Some(help) = &question.help {
            writeln!(self.output)?;
            writeln!(self.output, "    i  {help}")?;
        }
        if !question.controls.is_empty() {
            writeln!(self.output, "    NIST controls: {}", question.controls.join(", "))?;
        }
        writeln!(self.output)?;

        match &question.answer_type {
            AnswerType::SingleChoice { values } | AnswerType::MultiChoice { values } => {
                for (i, value) in values.iter().enumerate() {
                    writeln!(self.output, "  {}) {value}", i + 1)?;
                }
                writeln!(self.output)?;
            }
            AnswerType::FreeText { values } if !values.is_empty() => {
                for (i, value) in values.iter().enumerate() {
                    writeln!(self.output, "  {}) {value}", i + 1)?;
                }
                writeln!(self.output)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn show_prompt(&mut self, question: &Question) -> io::Result<()> {
        let prompt = match &question.answer_type {
            AnswerType::Boolean => "  Answer [Y/N]: ".to_string(),
            AnswerType::SingleChoice { .. } => "  Enter number: ".to_string(),
            AnswerType::MultiChoice { .. } => {
                "  Your selection (e.g. 1,3,5 or 'all'): ".to_string()
            }
            AnswerType::FreeText { .. } => "  Your answer: ".to_string(),
            AnswerType::Number { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => format!("  Enter a number ({lo} to {hi}): "),
                _ => "  Enter a number: ".to_string(),
            },
        };
        write!(self.output, "{prompt}")?;
        self.output.flush()
    }

    fn ask(&mut self, question: &Question) -> io::Result<Input> {
        if self.reprompt {
            self.reprompt = false;
        } else {
            self.show_question(question)?;
        }
        self.show_prompt(question)?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(Input::Abort);
        }
        Ok(interpret_line(question, &line))
    }
}

impl<R: BufRead, W: Write> InputProvider for InteractiveProvider<R, W> {
    fn begin_module(&mut self, module: &QuestionModule) {
        let rule = "-".repeat(60);
        if let Err(err) = writeln!(self.output, "\n{rule}\n  {}\n{rule}\n", module.title) {
            tracing::warn!(module = %module.id, error = %err, "terminal i/o failed");
        }
    }

    fn next_value(&mut self, question: &Question, _answers: &AnswerSet) -> Input {
        match self.ask(question) {
            Ok(input) => input,
            Err(err) => {
                tracing::warn!(error = %err, "terminal i/o failed");
                Input::Abort
            }
        }
    }

    fn on_invalid(&mut self, question: &Question, error: &ValidationError) -> OnInvalid {
        if let Err(err) = writeln!(self.output, "  {}. Please try again.", error.reason) {
            tracing::warn!(question = %question.id, error = %err, "terminal i/o failed");
        }
        self.reprompt = true;
        OnInvalid::Resolicit
    }
}

/// Ask for the subject fields that are still missing.
///
/// Organization and assessor are re-asked until non-empty; CAGE code and
/// contract may be skipped with ENTER. End of input leaves the remaining
/// fields unset.
pub fn prompt_subject<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mut subject: Subject,
) -> io::Result<Subject> {
    if !subject_is_incomplete(&subject) {
        return Ok(subject);
    }
    writeln!(output, "\n  ORGANIZATION INFORMATION\n")?;

    let fields: [(&str, bool, fn(&mut Subject) -> &mut Option<String>); 4] = [
        ("Company / Organization name: ", true, |s| &mut s.organization),
        ("CAGE Code (if known, or press ENTER to skip): ", false, |s| {
            &mut s.cage_code
        }),
        ("Person completing this assessment: ", true, |s| &mut s.assessor),
        ("Primary DoD contract number (or press ENTER): ", false, |s| {
            &mut s.contract_ref
        }),
    ];

    for (label, required, field) in fields {
        if field(&mut subject).is_some() {
            continue;
        }
        loop {
            write!(output, "  {label}")?;
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Ok(subject);
            }
            let value = line.trim();
            if !value.is_empty() {
                *field(&mut subject) = Some(value.to_string());
                break;
            }
            if !required {
                break;
            }
            writeln!(output, "  This field is required.")?;
        }
    }
    writeln!(output)?;
    Ok(subject)
}

fn subject_is_incomplete(subject: &Subject) -> bool {
    subject.organization.is_none()
        || subject.assessor.is_none()
        || subject.cage_code.is_none()
        || subject.contract_ref.is_none()
}
