//! Yes/no confirmation prompts.
//!
//! The codec never reads the terminal directly. It asks a [`Confirm`]
//! implementation, so headless callers and tests can supply canned answers.

use crate::error::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// A source of yes/no answers.
pub trait Confirm {
    /// Ask `question`. `default_yes` decides the answer for empty input.
    fn confirm(&mut self, question: &str, default_yes: bool) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str, bool) -> bool,
{
    fn confirm(&mut self, question: &str, default_yes: bool) -> Result<bool> {
        Ok(self(question, default_yes))
    }
}

/// Interpret a typed answer. An empty line takes the default; anything else,
/// whitespace included, is yes only if it starts with `y`.
pub fn parse_answer(input: &str, default_yes: bool) -> bool {
    let answer = input.trim_end_matches(['\r', '\n']);
    if answer.is_empty() {
        default_yes
    } else {
        answer.starts_with(['y', 'Y'])
    }
}

/// Question text with the `[Y/n]` / `[y/N]` hint appended.
pub fn format_question(question: &str, default_yes: bool) -> String {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    format!("{} {} ", question, hint)
}

/// Prompts on a writer and reads one line per question.
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirm<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, question: &str, default_yes: bool) -> Result<bool> {
        write!(self.output, "{}", format_question(question, default_yes))?;
        self.output.flush()?;

        // EOF reads as an empty answer.
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(parse_answer(&line, default_yes))
    }
}

/// Answers every question with yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, question: &str, _default_yes: bool) -> Result<bool> {
        tracing::debug!(question, "assuming yes");
        Ok(true)
    }
}

/// Replays typed answers in order, recording each question asked.
///
/// Once the script runs out every further question gets an empty answer.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConfirm {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, question: &str, default_yes: bool) -> Result<bool> {
        self.asked.push(question.to_string());
        let answer = self.answers.pop_front().unwrap_or_default();
        Ok(parse_answer(&answer, default_yes))
    }
}
