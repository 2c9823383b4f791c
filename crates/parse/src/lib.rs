mod cursor;
mod errors;
mod trace;

pub use crate::cursor::Cursor;
pub use crate::errors::{Error, SyntaxError, SyntaxErrorKind};
pub use crate::trace::{Trace, TraceWriter};

use lex::{Token, TokenKind};

use tracing::{debug, trace};

/// Checks that `tokens` form a complete program.
pub fn parse(tokens: &[Token]) -> Result<(), SyntaxError> {
    Parser::new(tokens)?.parse()
}

/// Like `parse`, reporting every applied production to `trace`.
pub fn parse_with_trace(tokens: &[Token], trace: &mut dyn Trace) -> Result<(), SyntaxError> {
    Parser::with_trace(tokens, trace)?.parse()
}

/// Checks that `tokens` form exactly one expression.
pub fn parse_expression(tokens: &[Token]) -> Result<(), SyntaxError> {
    Parser::new(tokens)?.parse_standalone_expression()
}

/// Scans and parses `source`, stopping at the first diagnostic.
pub fn check(source: &str, trace: Option<&mut dyn Trace>) -> Result<(), Error> {
    let tokens = lex::scan(source)?;
    let parser = match trace {
        Some(trace) => Parser::with_trace(&tokens, trace)?,
        None => Parser::new(&tokens)?,
    };
    parser.parse()?;
    Ok(())
}

/// Predictive recognizer for the language grammar.
///
/// Every choice is made from the kind of the current token alone and no
/// alternative is ever retried, so the cursor only moves forward.
pub struct Parser<'t, 's> {
    cursor: Cursor<'t>,
    trace: Option<&'s mut dyn Trace>,
}

impl<'t, 's> Parser<'t, 's> {
    pub fn new(tokens: &'t [Token]) -> Result<Self, SyntaxError> {
        Ok(Self {
            cursor: Cursor::new(tokens)?,
            trace: None,
        })
    }

    pub fn with_trace(tokens: &'t [Token], trace: &'s mut dyn Trace) -> Result<Self, SyntaxError> {
        Ok(Self {
            cursor: Cursor::new(tokens)?,
            trace: Some(trace),
        })
    }

    pub fn parse(mut self) -> Result<(), SyntaxError> {
        self.parse_source()?;
        self.expect_end()?;
        debug!(tokens = self.cursor.position() + 1, "parsed source");
        Ok(())
    }

    pub fn parse_standalone_expression(mut self) -> Result<(), SyntaxError> {
        self.parse_expression()?;
        self.expect_end()
    }

    // The start rule `source -> definitions` is implied, the trace begins
    // with the first `definitions` production.
    fn parse_source(&mut self) -> Result<(), SyntaxError> {
        self.parse_definitions()
    }

    // Right recursive rules are walked with loops so long inputs do not grow
    // the stack. The trace is the same as for the recursive form.
    //
    // A trailing `;` is allowed, so another definition only follows when one
    // actually starts after it.
    fn parse_definitions(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.emit("definitions -> definition definitions2");
            self.parse_definition()?;

            if !self.cursor.check(TokenKind::Semicolon) {
                self.emit("definitions2 -> ε");
                return Ok(());
            }
            self.emit("definitions2 -> ; definitions3");
            self.cursor.advance();

            if !self.starts_definition() {
                self.emit("definitions3 -> ε");
                return Ok(());
            }
            self.emit("definitions3 -> definitions");
        }
    }

    fn starts_definition(&self) -> bool {
        matches!(self.cursor.peek().kind, TokenKind::Typ | TokenKind::Var | TokenKind::Fun)
    }

    fn parse_definition(&mut self) -> Result<(), SyntaxError> {
        match self.cursor.peek().kind {
            TokenKind::Typ => {
                self.emit("definition -> type_definition");
                self.parse_type_definition()
            }
            TokenKind::Var => {
                self.emit("definition -> variable_definition");
                self.parse_variable_definition()
            }
            TokenKind::Fun => {
                self.emit("definition -> function_definition");
                self.parse_function_definition()
            }
            _ => Err(self.unexpected("a definition (`typ`, `var` or `fun`)")),
        }
    }

    fn parse_type_definition(&mut self) -> Result<(), SyntaxError> {
        self.emit("type_definition -> typ identifier : type");
        self.expect(TokenKind::Typ)?;
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Colon)?;
        self.parse_type()
    }

    fn parse_variable_definition(&mut self) -> Result<(), SyntaxError> {
        self.emit("variable_definition -> var identifier : type");
        self.expect(TokenKind::Var)?;
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Colon)?;
        self.parse_type()
    }

    fn parse_function_definition(&mut self) -> Result<(), SyntaxError> {
        self.emit("function_definition -> fun identifier ( parameters ) : type = expression");
        self.expect(TokenKind::Fun)?;
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::LeftParen)?;
        self.parse_parameters()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Colon)?;
        self.parse_type()?;
        self.expect(TokenKind::Eq)?;
        self.parse_expression()
    }

    fn parse_type(&mut self) -> Result<(), SyntaxError> {
        while self.cursor.check(TokenKind::Arr) {
            self.emit("type -> arr [ int_const ] type");
            self.cursor.advance();
            self.expect(TokenKind::LeftBracket)?;
            self.expect(TokenKind::IntConst)?;
            self.expect(TokenKind::RightBracket)?;
        }

        let production = match self.cursor.peek().kind {
            TokenKind::LogicalType => "type -> logical",
            TokenKind::IntegerType => "type -> integer",
            TokenKind::StringType => "type -> string",
            TokenKind::Identifier => "type -> identifier",
            _ => return Err(self.unexpected("a type")),
        };

        self.emit(production);
        self.cursor.advance();
        Ok(())
    }

    fn parse_parameters(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.emit("parameters -> parameter parameters2");
            self.parse_parameter()?;

            if !self.cursor.check(TokenKind::Comma) {
                self.emit("parameters2 -> ε");
                return Ok(());
            }
            self.emit("parameters2 -> , parameters");
            self.cursor.advance();
        }
    }

    fn parse_parameter(&mut self) -> Result<(), SyntaxError> {
        self.emit("parameter -> identifier : type");
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Colon)?;
        self.parse_type()
    }

    fn parse_expression(&mut self) -> Result<(), SyntaxError> {
        self.emit("expression -> logical_or_expression");
        self.parse_logical_or_expression()
    }

    fn parse_logical_or_expression(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.emit("logical_or_expression -> logical_and_expression logical_or_expression2");
            self.parse_logical_and_expression()?;

            if !self.cursor.check(TokenKind::Or) {
                self.emit("logical_or_expression2 -> ε");
                return Ok(());
            }
            self.emit("logical_or_expression2 -> | logical_or_expression");
            self.cursor.advance();
        }
    }

    fn parse_logical_and_expression(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.emit("logical_and_expression -> compare_expression logical_and_expression2");
            self.parse_compare_expression()?;

            if !self.cursor.check(TokenKind::And) {
                self.emit("logical_and_expression2 -> ε");
                return Ok(());
            }
            self.emit("logical_and_expression2 -> & logical_and_expression");
            self.cursor.advance();
        }
    }

    // Comparisons do not associate: after one operator the right operand is an
    // additive expression, so a second operator is left for the caller.
    fn parse_compare_expression(&mut self) -> Result<(), SyntaxError> {
        self.emit("compare_expression -> additive_expression compare_expression2");
        self.parse_additive_expression()?;

        let production = match self.cursor.peek().kind {
            TokenKind::EqEq => "compare_expression2 -> == additive_expression",
            TokenKind::BangEq => "compare_expression2 -> != additive_expression",
            TokenKind::LessThanEq => "compare_expression2 -> <= additive_expression",
            TokenKind::GreaterThanEq => "compare_expression2 -> >= additive_expression",
            TokenKind::LessThan => "compare_expression2 -> < additive_expression",
            TokenKind::GreaterThan => "compare_expression2 -> > additive_expression",
            _ => {
                self.emit("compare_expression2 -> ε");
                return Ok(());
            }
        };

        self.emit(production);
        self.cursor.advance();
        self.parse_additive_expression()
    }

    fn parse_additive_expression(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.emit("additive_expression -> multiplicative_expression additive_expression2");
            self.parse_multiplicative_expression()?;

            let production = match self.cursor.peek().kind {
                TokenKind::Plus => "additive_expression2 -> + additive_expression",
                TokenKind::Minus => "additive_expression2 -> - additive_expression",
                _ => {
                    self.emit("additive_expression2 -> ε");
                    return Ok(());
                }
            };

            self.emit(production);
            self.cursor.advance();
        }
    }

    fn parse_multiplicative_expression(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.emit("multiplicative_expression -> prefix_expression multiplicative_expression2");
            self.parse_prefix_expression()?;

            let production = match self.cursor.peek().kind {
                TokenKind::Star => "multiplicative_expression2 -> * multiplicative_expression",
                TokenKind::Slash => "multiplicative_expression2 -> / multiplicative_expression",
                TokenKind::Percent => "multiplicative_expression2 -> % multiplicative_expression",
                _ => {
                    self.emit("multiplicative_expression2 -> ε");
                    return Ok(());
                }
            };

            self.emit(production);
            self.cursor.advance();
        }
    }

    fn parse_prefix_expression(&mut self) -> Result<(), SyntaxError> {
        loop {
            let production = match self.cursor.peek().kind {
                TokenKind::Plus => "prefix_expression -> + prefix_expression",
                TokenKind::Minus => "prefix_expression -> - prefix_expression",
                TokenKind::Bang => "prefix_expression -> ! prefix_expression",
                _ => {
                    self.emit("prefix_expression -> postfix_expression");
                    return self.parse_postfix_expression();
                }
            };

            self.emit(production);
            self.cursor.advance();
        }
    }

    fn parse_postfix_expression(&mut self) -> Result<(), SyntaxError> {
        self.emit("postfix_expression -> atom_expression postfix_expression2");
        self.parse_atom_expression()?;

        while self.cursor.check(TokenKind::LeftBracket) {
            self.emit("postfix_expression2 -> [ expression ] postfix_expression2");
            self.cursor.advance();
            self.parse_expression()?;
            self.expect(TokenKind::RightBracket)?;
        }

        self.emit("postfix_expression2 -> ε");
        Ok(())
    }

    fn parse_atom_expression(&mut self) -> Result<(), SyntaxError> {
        match self.cursor.peek().kind {
            TokenKind::LogicalConst => {
                self.emit("atom_expression -> log_constant");
                self.cursor.advance();
                Ok(())
            }
            TokenKind::IntConst => {
                self.emit("atom_expression -> int_constant");
                self.cursor.advance();
                Ok(())
            }
            TokenKind::StringConst => {
                self.emit("atom_expression -> str_constant");
                self.cursor.advance();
                Ok(())
            }
            TokenKind::Identifier => {
                self.emit("atom_expression -> identifier atom_expression2");
                self.cursor.advance();
                self.parse_call_arguments()
            }
            TokenKind::LeftParen => {
                self.emit("atom_expression -> ( expressions )");
                self.cursor.advance();
                self.parse_expressions()?;
                self.expect(TokenKind::RightParen)?;
                Ok(())
            }
            TokenKind::LeftBrace => {
                self.emit("atom_expression -> { braced_expression");
                self.cursor.advance();
                self.parse_braced_expression()
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_call_arguments(&mut self) -> Result<(), SyntaxError> {
        if self.cursor.check(TokenKind::LeftParen) {
            self.emit("atom_expression2 -> ( expressions )");
            self.cursor.advance();
            self.parse_expressions()?;
            self.expect(TokenKind::RightParen)?;
        } else {
            self.emit("atom_expression2 -> ε");
        }
        Ok(())
    }

    // The opening brace has been consumed.
    fn parse_braced_expression(&mut self) -> Result<(), SyntaxError> {
        match self.cursor.peek().kind {
            TokenKind::While => {
                self.emit("braced_expression -> while expression : expression }");
                self.cursor.advance();
                self.parse_expression()?;
                self.expect(TokenKind::Colon)?;
                self.parse_expression()?;
                self.expect(TokenKind::RightBrace)?;
                Ok(())
            }
            TokenKind::For => {
                self.emit("braced_expression -> for identifier = expression , expression , expression : expression }");
                self.cursor.advance();
                self.expect(TokenKind::Identifier)?;
                self.expect(TokenKind::Eq)?;
                self.parse_expression()?;
                self.expect(TokenKind::Comma)?;
                self.parse_expression()?;
                self.expect(TokenKind::Comma)?;
                self.parse_expression()?;
                self.expect(TokenKind::Colon)?;
                self.parse_expression()?;
                self.expect(TokenKind::RightBrace)?;
                Ok(())
            }
            TokenKind::If => {
                self.emit("braced_expression -> if expression then expression if_expression2");
                self.cursor.advance();
                self.parse_expression()?;
                self.expect(TokenKind::Then)?;
                self.parse_expression()?;
                self.parse_if_expression2()
            }
            _ => {
                self.emit("braced_expression -> expression braced_expression2");
                self.parse_expression()?;
                self.parse_braced_expression2()
            }
        }
    }

    fn parse_if_expression2(&mut self) -> Result<(), SyntaxError> {
        match self.cursor.peek().kind {
            TokenKind::Else => {
                self.emit("if_expression2 -> else expression }");
                self.cursor.advance();
                self.parse_expression()?;
                self.expect(TokenKind::RightBrace)?;
                Ok(())
            }
            TokenKind::RightBrace => {
                self.emit("if_expression2 -> }");
                self.cursor.advance();
                Ok(())
            }
            _ => Err(self.unexpected("`else` or `}`")),
        }
    }

    fn parse_braced_expression2(&mut self) -> Result<(), SyntaxError> {
        match self.cursor.peek().kind {
            TokenKind::Eq => {
                self.emit("braced_expression2 -> = expression }");
                self.cursor.advance();
                self.parse_expression()?;
                self.expect(TokenKind::RightBrace)?;
                Ok(())
            }
            TokenKind::Where => {
                self.emit("braced_expression2 -> where definitions }");
                self.cursor.advance();
                self.parse_definitions()?;
                self.expect(TokenKind::RightBrace)?;
                Ok(())
            }
            TokenKind::RightBrace => {
                self.emit("braced_expression2 -> }");
                self.cursor.advance();
                Ok(())
            }
            _ => Err(self.unexpected("`=`, `where` or `}`")),
        }
    }

    fn parse_expressions(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.emit("expressions -> expression expressions2");
            self.parse_expression()?;

            if !self.cursor.check(TokenKind::Comma) {
                self.emit("expressions2 -> ε");
                return Ok(());
            }
            self.emit("expressions2 -> , expressions");
            self.cursor.advance();
        }
    }

    fn expect_end(&self) -> Result<(), SyntaxError> {
        if self.cursor.is_at_end() {
            Ok(())
        } else {
            Err(SyntaxError::trailing(self.cursor.peek()))
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&'t Token, SyntaxError> {
        // Nothing is consumed on a mismatch, the error points at the offending token.
        if self.cursor.check(kind) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::unexpected(self.cursor.peek(), expected)
    }

    fn emit(&mut self, production: &str) {
        trace!(%production, "production");
        if let Some(sink) = self.trace.as_mut() {
            sink.production(production);
        }
    }
}

#[cfg(test)]
mod tests;
