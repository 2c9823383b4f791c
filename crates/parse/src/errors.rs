use lex::{LexError, Position, Token, TokenKind};

use thiserror::Error;
use std::fmt;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { found: String, expected: String },
    #[error("unexpected {found} after the last definition")]
    TrailingInput { found: String },
    #[error("token sequence does not end with a single end of input")]
    MissingEndOfInput,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub position: Position,
    #[source]
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(position: Position, kind: SyntaxErrorKind) -> Self {
        Self { position, kind }
    }

    pub(crate) fn unexpected(token: &Token, expected: &str) -> Self {
        Self::new(token.position, SyntaxErrorKind::UnexpectedToken {
            found: describe_found(token),
            expected: expected.to_string(),
        })
    }

    pub(crate) fn trailing(token: &Token) -> Self {
        Self::new(token.position, SyntaxErrorKind::TrailingInput {
            found: describe_found(token),
        })
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.kind, self.position)
    }
}

fn describe_found(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => TokenKind::Eof.describe(),
        TokenKind::StringConst => format!("string constant '{}'", token.lexeme),
        _ => format!("`{}`", token.lexeme),
    }
}

/// A diagnostic from either front end phase.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

impl Error {
    pub fn position(&self) -> Position {
        match self {
            Error::Lexical(err) => err.position,
            Error::Syntax(err) => err.position,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::Lexical(err) => err.kind.to_string(),
            Error::Syntax(err) => err.kind.to_string(),
        }
    }
}
