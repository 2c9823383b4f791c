use crate::position::Position;

use once_cell::sync::Lazy;

use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Identifier,
    IntConst,
    StringConst,
    LogicalConst,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Logical
    And,
    Or,
    Bang,

    // Comparisons
    EqEq,
    BangEq,
    LessThan,
    LessThanEq,
    GreaterThan,
    GreaterThanEq,

    // Assignment
    Eq,

    // Groupings
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // Punctuation
    Colon,
    Semicolon,
    Dot,
    Comma,

    // Keywords
    Typ,
    Var,
    Fun,
    Arr,
    While,
    For,
    If,
    Then,
    Else,
    Where,

    // Primitive types
    LogicalType,
    IntegerType,
    StringType,

    Eof,
}

impl TokenKind {
    pub const ALL: &'static [TokenKind] = &[
        TokenKind::Identifier,
        TokenKind::IntConst,
        TokenKind::StringConst,
        TokenKind::LogicalConst,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Bang,
        TokenKind::EqEq,
        TokenKind::BangEq,
        TokenKind::LessThan,
        TokenKind::LessThanEq,
        TokenKind::GreaterThan,
        TokenKind::GreaterThanEq,
        TokenKind::Eq,
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftBracket,
        TokenKind::RightBracket,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::Colon,
        TokenKind::Semicolon,
        TokenKind::Dot,
        TokenKind::Comma,
        TokenKind::Typ,
        TokenKind::Var,
        TokenKind::Fun,
        TokenKind::Arr,
        TokenKind::While,
        TokenKind::For,
        TokenKind::If,
        TokenKind::Then,
        TokenKind::Else,
        TokenKind::Where,
        TokenKind::LogicalType,
        TokenKind::IntegerType,
        TokenKind::StringType,
        TokenKind::Eof,
    ];

    /// The reserved spelling of keyword and primitive type kinds.
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            TokenKind::Typ => "typ",
            TokenKind::Var => "var",
            TokenKind::Fun => "fun",
            TokenKind::Arr => "arr",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Else => "else",
            TokenKind::Where => "where",
            TokenKind::LogicalType => "logical",
            TokenKind::IntegerType => "integer",
            TokenKind::StringType => "string",
            _ => return None,
        };
        Some(keyword)
    }

    /// Fixed source spelling of operators and punctuation.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Bang => "!",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::LessThan => "<",
            TokenKind::LessThanEq => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanEq => ">=",
            TokenKind::Eq => "=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            _ => return None,
        };
        Some(symbol)
    }

    /// Human readable name used in diagnostics.
    pub fn describe(&self) -> String {
        if let Some(text) = self.keyword().or_else(|| self.symbol()) {
            return format!("`{}`", text);
        }

        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::IntConst => "integer constant",
            TokenKind::StringConst => "string constant",
            TokenKind::LogicalConst => "logical constant",
            _ => "end of input",
        };
        name.to_string()
    }
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    TokenKind::ALL
        .iter()
        .filter_map(|kind| kind.keyword().map(|keyword| (keyword, *kind)))
        .collect()
});

/// The keyword table, built on first use and never modified.
pub fn keywords() -> &'static HashMap<&'static str, TokenKind> {
    &KEYWORDS
}

pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    KEYWORDS.get(text).copied()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub position: Position,
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new<S: Into<String>>(position: Position, kind: TokenKind, lexeme: S) -> Self {
        Self {
            position,
            kind,
            lexeme: lexeme.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:?} {}", self.position, self.kind, self.lexeme)
    }
}
