pub mod chars;
mod errors;
mod position;
mod token;

pub use crate::errors::{LexError, LexErrorKind};
pub use crate::position::{Location, Position};
pub use crate::token::{keywords, lookup_keyword, Token, TokenKind};

use crate::chars::{is_digit, is_identifier_continue, is_identifier_start, is_line_break, is_printable};

use tracing::{debug, trace};

use std::iter::Peekable;
use std::str::CharIndices;

const TAB_WIDTH: usize = 4;

/// Lexeme of the end-of-input token.
pub const EOF_LEXEME: &str = "$";

/// Scans the whole source, returning its tokens followed by a single end-of-input token.
pub fn scan(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(source).collect::<Result<Vec<_>, _>>()?;
    debug!(count = tokens.len(), "scanned source");
    Ok(tokens)
}

#[derive(Clone, Copy, Debug)]
struct Cursor {
    pos: usize,
    line: usize,
    col: usize,
}

impl Cursor {
    fn start() -> Self {
        Self {
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.col)
    }
}

/// Single pass scanner over a source text.
///
/// Yields every token, then one `Eof` token, then stops. Once an error has
/// been yielded the lexer is exhausted.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    cursor: Cursor,
    token: Cursor,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            cursor: Cursor::start(),
            token: Cursor::start(),
            finished: false,
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        while let Some(c) = self.peek() {
            self.token = self.cursor;

            self.consume();

            let kind = match c {
                ' ' | '\t' | '\n' | '\r' => {
                    self.consume_while(|next| next == c);
                    continue;
                }
                '#' => {
                    self.consume_while(|c| !is_line_break(c));
                    continue;
                }
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '&' => TokenKind::And,
                '|' => TokenKind::Or,
                '!' => {
                    if self.matches('=') {
                        TokenKind::BangEq
                    } else {
                        TokenKind::Bang
                    }
                }
                '=' => {
                    if self.matches('=') {
                        TokenKind::EqEq
                    } else {
                        TokenKind::Eq
                    }
                }
                '<' => {
                    if self.matches('=') {
                        TokenKind::LessThanEq
                    } else {
                        TokenKind::LessThan
                    }
                }
                '>' => {
                    if self.matches('=') {
                        TokenKind::GreaterThanEq
                    } else {
                        TokenKind::GreaterThan
                    }
                }
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '[' => TokenKind::LeftBracket,
                ']' => TokenKind::RightBracket,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ':' => TokenKind::Colon,
                ';' => TokenKind::Semicolon,
                '.' => TokenKind::Dot,
                ',' => TokenKind::Comma,
                '\'' => return self.read_string(),
                c if is_digit(c) => {
                    self.consume_while(is_digit);
                    TokenKind::IntConst
                }
                c if is_identifier_start(c) => self.read_identifier(),
                _ => return Err(self.error(LexErrorKind::UnexpectedCharacter(c))),
            };

            return Ok(self.create_token(kind, self.current_lexeme()));
        }

        self.token = self.cursor;
        Ok(Token::new(Position::point(self.cursor.location()), TokenKind::Eof, EOF_LEXEME))
    }

    fn create_token<S: Into<String>>(&self, kind: TokenKind, lexeme: S) -> Token {
        Token::new(self.token_position(), kind, lexeme)
    }

    fn token_position(&self) -> Position {
        Position::between(self.token.location(), self.cursor.location())
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(self.token_position(), kind)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn consume(&mut self) {
        if let Some((i, c)) = self.chars.next() {
            self.cursor.pos = i + c.len_utf8();
            match c {
                '\n' => self.newline(),
                '\r' => {
                    // CRLF is a single line break.
                    if let Some(&(j, '\n')) = self.chars.peek() {
                        self.chars.next();
                        self.cursor.pos = j + 1;
                    }
                    self.newline();
                }
                '\t' => self.cursor.col += TAB_WIDTH,
                _ => self.cursor.col += 1,
            }
        }
    }

    fn newline(&mut self) {
        self.cursor.line += 1;
        self.cursor.col = 1;
    }

    fn consume_while<F>(&mut self, func: F) where F: Fn(char) -> bool {
        while let Some(c) = self.peek() {
            if func(c) {
                self.consume()
            } else {
                break
            }
        }
    }

    fn matches(&mut self, c: char) -> bool {
        match self.peek() {
            Some(p) if p == c => {
                self.consume();
                true
            }
            _ => false,
        }
    }

    fn current_lexeme(&self) -> &'a str {
        &self.input[self.token.pos..self.cursor.pos]
    }

    // The opening quote has already been consumed. Doubled quotes stand for a
    // single quote character and the stored lexeme holds the resolved value.
    fn read_string(&mut self) -> Result<Token, LexError> {
        let mut value = String::new();

        loop {
            match self.peek() {
                Some('\'') => {
                    self.consume();
                    if self.matches('\'') {
                        value.push('\'');
                    } else {
                        return Ok(self.create_token(TokenKind::StringConst, value));
                    }
                }
                Some(c) if is_printable(c) => {
                    self.consume();
                    value.push(c);
                }
                Some(c) if !is_line_break(c) => {
                    let start = self.cursor.location();
                    self.consume();
                    let position = Position::between(start, self.cursor.location());
                    return Err(LexError::new(position, LexErrorKind::UnexpectedCharacter(c)));
                }
                _ => return Err(self.error(LexErrorKind::UnterminatedString)),
            }
        }
    }

    fn read_identifier(&mut self) -> TokenKind {
        self.consume_while(is_identifier_continue);

        let lexeme = self.current_lexeme();
        match lookup_keyword(lexeme) {
            Some(kind) => kind,
            None if lexeme == "true" || lexeme == "false" => TokenKind::LogicalConst,
            None => TokenKind::Identifier,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_token();
        match &result {
            Ok(token) => {
                trace!(%token, "token");
                self.finished = token.kind == TokenKind::Eof;
            }
            Err(_) => self.finished = true,
        }

        Some(result)
    }
}
