use crate::{EvalError, ParseError};
use ariadne::{Label, Report, ReportKind, Source};
use std::ops::Range;

const SOURCE_ID: &str = "REPL";

impl EvalError {
    /// Prints a diagnostic for this error to stderr. Values carry no source
    /// positions, so the label covers the whole input line.
    pub fn pretty_print(&self, input: &str) -> std::io::Result<()> {
        let span = 0..input.len();
        let (message, note) = match self {
            EvalError::ArityMismatch { procedure, .. } => (
                format!("Arity mismatch calling `{}`", procedure),
                self.to_string(),
            ),
            EvalError::MissingOperand { form, .. } => (
                format!("Malformed `{}` form", form),
                self.to_string(),
            ),
            EvalError::EmptyForm => (
                "Empty form".to_string(),
                "`()` has no operator to dispatch on".to_string(),
            ),
            EvalError::NotASymbol { form, found } => (
                format!("Not a symbol: {}", found),
                format!("`{}` needs a symbol here", form),
            ),
            EvalError::TypeMismatch { expected, found } => (
                "Type mismatch".to_string(),
                format!("Expected {}, found {}", expected, found),
            ),
            EvalError::StackLimitExceeded { limit } => (
                "Stack limit exceeded".to_string(),
                format!("More than {} nested calls", limit),
            ),
            EvalError::Output(message) => ("Output error".to_string(), message.clone()),
        };
        print_report(input, span, message, note)
    }
}

impl ParseError {
    pub fn pretty_print(&self, input: &str) -> std::io::Result<()> {
        let span = self.span().to_range();
        match self {
            ParseError::UnexpectedEof { .. } => print_report(
                input,
                span,
                "Unexpected EOF".to_string(),
                "this expression is never closed".to_string(),
            ),
            ParseError::UnmatchedCloseParen { .. } => print_report(
                input,
                span,
                "Unexpected ')'".to_string(),
                "no matching '('".to_string(),
            ),
        }
    }
}

fn print_report(
    input: &str,
    span: Range<usize>,
    message: String,
    note: String,
) -> std::io::Result<()> {
    Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
        .with_message(message)
        .with_label(Label::new((SOURCE_ID, span)).with_message(note))
        .finish()
        .eprint((SOURCE_ID, Source::from(input)))
}
