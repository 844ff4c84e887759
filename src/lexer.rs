use logos::Logos;
use std::fmt;

use crate::Span;

/// Lexical units of the language. Parentheses always stand alone; any other
/// run of characters up to whitespace or a parenthesis is one opaque atom.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\x0B\x0C]+")] // Skip whitespace
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[^ \t\n\r\x0B\x0C()]+", |lex| lex.slice().to_string())]
    Atom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Atom(text) => write!(f, "{}", text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Splits `input` into tokens. Never fails: blank input gives an empty vector.
pub fn tokenize(input: &str) -> Vec<Token> {
    TokenKind::lexer(input)
        .spanned()
        // Every character is either skipped or matched by a rule, so the
        // lexer has no error branch to report.
        .filter_map(|(result, range)| {
            result.ok().map(|kind| Token {
                kind,
                span: Span::new(range.start, range.end),
            })
        })
        .collect()
}

/// Renders tokens the way the shell echoes them: `[(, +, 1, 2, )]`.
pub fn render_tokens(tokens: &[Token]) -> String {
    let parts: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
