use crate::position::Position;

use thiserror::Error;
use std::fmt;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub position: Position,
    #[source]
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(position: Position, kind: LexErrorKind) -> Self {
        Self { position, kind }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.kind, self.position)
    }
}
