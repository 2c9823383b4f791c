//! Character classes recognised by the scanner.
//!
//! Source text is restricted to printable ASCII (`' '..='~'`, bytes 32 to 126)
//! plus the whitespace characters tab, line feed and carriage return.

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_identifier_start(c: char) -> bool {
    is_alpha(c) || c == '_'
}

pub fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || is_digit(c)
}

pub fn is_printable(c: char) -> bool {
    matches!(c, ' '..='~')
}

pub fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}
