// Declare modules publicly so they are part of the library interface
pub mod config;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod pretty_print;
pub mod primitives;
pub mod shell;
pub mod source;
pub mod types;

pub use config::{ConfigError, InterpreterConfig, ReplConfig};
pub use environment::Environment;
pub use evaluator::{EvalError, EvalResult, EvalWarning, Evaluator};
pub use lexer::{Token, TokenKind, tokenize};
pub use numeric::Number;
pub use parser::{ParseError, Parser, parse_str};
pub use shell::ShellError;
pub use source::Span;
pub use types::{Procedure, Value};
