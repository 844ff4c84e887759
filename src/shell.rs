//! The line-at-a-time driver shared by both binaries.

use crate::evaluator::{EvalError, Evaluator};
use crate::lexer::{render_tokens, tokenize};
use crate::parser::{ParseError, Parser};
use thiserror::Error;

pub const BANNER: &str = "Simple LISP interpreter (tinylisp v0.1.0)";
pub const PROMPT: &str = ">>>";
pub const QUIT_COMMAND: &str = "quit";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShellError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

impl ShellError {
    pub fn pretty_print(&self, input: &str) -> std::io::Result<()> {
        match self {
            ShellError::Parse(e) => e.pretty_print(input),
            ShellError::Eval(e) => e.pretty_print(input),
        }
    }
}

/// What the loop should do with a raw input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Quit,
    Skip,
    Evaluate,
}

/// Only a line that is exactly the quit command ends the session.
pub fn classify_line(line: &str) -> LineAction {
    if line == QUIT_COMMAND {
        LineAction::Quit
    } else if line.trim().is_empty() {
        LineAction::Skip
    } else {
        LineAction::Evaluate
    }
}

/// Runs one input line through the pipeline, writing (in order) the tokens,
/// then each expression's parsed tree and its result. Everything goes through
/// the evaluator's output so `repeat` lines land between tree and result.
pub fn run_line(evaluator: &mut Evaluator, line: &str) -> Result<(), ShellError> {
    let tokens = tokenize(line);
    log::debug!("read {} token(s)", tokens.len());
    evaluator.emit(&render_tokens(&tokens))?;

    let mut parser = Parser::new(tokens);
    loop {
        let expr = parser.read()?;
        evaluator.emit(&expr.to_string())?;
        let value = evaluator.eval(&expr)?;
        evaluator.emit(&value.to_string())?;
        if parser.is_exhausted() {
            return Ok(());
        }
    }
}

/// Runs a line and reports any failure on stderr; the caller's loop keeps
/// going either way.
pub fn run_line_reporting(evaluator: &mut Evaluator, line: &str) {
    if let Err(err) = run_line(evaluator, line) {
        log::debug!("{:?}", err);
        if let Err(io_err) = err.pretty_print(line) {
            log::error!("could not render diagnostic: {}", io_err);
            eprintln!("Error: {}", err);
        }
    }
}
