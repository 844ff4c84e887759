use crate::Span;
use crate::lexer::{Token, TokenKind};
use crate::numeric::Number;
use crate::types::Value;
use std::iter::Peekable;
use std::vec::IntoIter; // To iterate over Vec<Token>
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Tokens ran out while an expression was still being read, e.g. an
    /// unmatched `(`.
    #[error("unexpected EOF while reading")]
    UnexpectedEof { span: Span },
    #[error("unexpected ')'")]
    UnmatchedCloseParen { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedEof { span } | ParseError::UnmatchedCloseParen { span } => *span,
        }
    }
}

// Result type alias for convenience
type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent reader with one token of lookahead. Each call to
/// [`Parser::read`] consumes exactly one expression from the front of the
/// token stream.
pub struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    // End offset of the last token, where EOF errors point.
    end: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.last().map_or(0, |t| t.span.end);
        Parser {
            tokens: tokens.into_iter().peekable(),
            end,
        }
    }

    /// True once every token has been consumed.
    pub fn is_exhausted(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    /// Reads one full expression.
    pub fn read(&mut self) -> ParseResult<Value> {
        let token = self.tokens.next().ok_or(ParseError::UnexpectedEof {
            span: Span::new(self.end, self.end),
        })?;
        match token.kind {
            TokenKind::LParen => self.read_list(token.span),
            TokenKind::RParen => Err(ParseError::UnmatchedCloseParen { span: token.span }),
            TokenKind::Atom(text) => Ok(atom(&text)),
        }
    }

    /// Reads list elements after an already consumed `(`, up to and
    /// including the matching `)`.
    fn read_list(&mut self, open: Span) -> ParseResult<Value> {
        let mut elements = Vec::new();
        loop {
            match self.tokens.peek() {
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }) => {
                    self.tokens.next();
                    return Ok(Value::List(elements));
                }
                Some(_) => elements.push(self.read()?),
                None => {
                    return Err(ParseError::UnexpectedEof {
                        span: open.merge(Span::new(self.end, self.end)),
                    });
                }
            }
        }
    }

    /// Reads expressions until the tokens run out.
    pub fn read_all(mut self) -> ParseResult<Vec<Value>> {
        let mut expressions = Vec::new();
        while !self.is_exhausted() {
            expressions.push(self.read()?);
        }
        Ok(expressions)
    }
}

/// Types a single atom token: a number if it parses as one, otherwise a
/// symbol.
pub fn atom(token: &str) -> Value {
    match Number::parse(token) {
        Some(n) => Value::Number(n),
        None => Value::Symbol(token.to_string()),
    }
}

// Helper function to lex and read the first expression of a string (useful for
// tests and the REPL). Anything after the first expression is ignored.
pub fn parse_str(input: &str) -> ParseResult<Value> {
    let tokens = crate::lexer::tokenize(input);
    Parser::new(tokens).read()
}
