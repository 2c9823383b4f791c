//! Single token lookahead over a scanned token sequence.

use crate::errors::{SyntaxError, SyntaxErrorKind};

use lex::{Token, TokenKind};

/// Forward only cursor over a token sequence.
///
/// Invariant: the sequence ends with exactly one `Eof` token and `pos` is
/// always a valid index, so `peek` never fails. The cursor stops on `Eof`.
pub struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Result<Self, SyntaxError> {
        let first_eof = tokens.iter().position(|token| token.kind == TokenKind::Eof);

        match first_eof {
            Some(index) if index + 1 == tokens.len() => Ok(Self { tokens, pos: 0 }),
            Some(index) => Err(SyntaxError::new(tokens[index].position, SyntaxErrorKind::MissingEndOfInput)),
            None => {
                let position = tokens.last().map(|token| token.position).unwrap_or_default();
                Err(SyntaxError::new(position, SyntaxErrorKind::MissingEndOfInput))
            }
        }
    }

    pub fn peek(&self) -> &'t Token {
        &self.tokens[self.pos]
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}
