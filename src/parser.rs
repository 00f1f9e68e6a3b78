use std::str::Chars;

use log::debug;

use crate::ast::{Expression, Function, Prototype};
use crate::cursor::TokenCursor;
use crate::lexer::{Lexer, Token};
use crate::precedence::PrecedenceTable;

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {0} when expecting an expression")]
    ExpectedExpression(Token),
    #[error("expected ')' after parenthesized expression, found {0}")]
    ExpectedCloseParen(Token),
    #[error("expected ')' or ',' in argument list, found {0}")]
    ExpectedArgumentSeparator(Token),
    #[error("expected function name in prototype, found {0}")]
    ExpectedFunctionName(Token),
    #[error("expected '(' in prototype, found {0}")]
    ExpectedPrototypeOpenParen(Token),
    #[error("expected ')' in prototype, found {0}")]
    ExpectedPrototypeCloseParen(Token),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// recursive descent parser over a character stream
///
/// The cursor is primed on construction, so every `parse_*` method starts
/// looking at a valid current token.
#[derive(Debug)]
pub struct Parser<I> {
    cursor: TokenCursor<I>,
    operator_precedence: PrecedenceTable,
}

impl<'a> Parser<Chars<'a>> {
    pub fn from_str(source: &'a str) -> Self {
        Self::new(source.chars(), PrecedenceTable::default())
    }
}

impl<I: Iterator<Item = char>> Parser<I> {
    pub fn new(input: I, operator_precedence: PrecedenceTable) -> Self {
        Self {
            cursor: TokenCursor::new(Lexer::new(input)),
            operator_precedence,
        }
    }

    pub fn current(&self) -> &Token {
        self.cursor.current()
    }

    pub fn advance(&mut self) -> &Token {
        self.cursor.advance()
    }

    pub fn operator_precedence(&self) -> &PrecedenceTable {
        &self.operator_precedence
    }

    pub fn operator_precedence_mut(&mut self) -> &mut PrecedenceTable {
        &mut self.operator_precedence
    }

    fn expect_char(&mut self, c: char, err: fn(Token) -> ParseError) -> ParseResult<()> {
        if self.current().is_char(c) {
            self.advance();
            Ok(())
        } else {
            Err(err(self.current().clone()))
        }
    }

    /// numberexpr ::= number
    fn parse_number(&mut self, value: f64) -> ParseResult<Expression> {
        self.advance();
        Ok(Expression::Number(value))
    }

    /// identifierexpr
    ///   ::= identifier
    ///   ::= identifier '(' (expression (',' expression)*)? ')'
    fn parse_identifier(&mut self, name: String) -> ParseResult<Expression> {
        self.advance();
        if !self.current().is_char('(') {
            return Ok(Expression::Variable(name));
        }
        self.advance();

        let mut args = Vec::new();
        if self.current().is_char(')') {
            self.advance();
            return Ok(Expression::Call(name, args));
        }

        loop {
            args.push(self.parse_expression()?);

            match self.current() {
                Token::Char(')') => {
                    self.advance();
                    break;
                }
                Token::Char(',') => {
                    self.advance();
                }
                other => return Err(ParseError::ExpectedArgumentSeparator(other.clone())),
            }
        }

        Ok(Expression::Call(name, args))
    }

    /// parenexpr ::= '(' expression ')'
    fn parse_nested(&mut self) -> ParseResult<Expression> {
        self.advance();
        let res = self.parse_expression()?;
        self.expect_char(')', ParseError::ExpectedCloseParen)?;
        Ok(res)
    }

    /// primary
    ///   ::= identifierexpr
    ///   ::= numberexpr
    ///   ::= parenexpr
    pub fn parse_primary(&mut self) -> ParseResult<Expression> {
        match self.current() {
            Token::Number(value) => {
                let value = *value;
                self.parse_number(value)
            }
            Token::Ident(name) => {
                let name = name.clone();
                self.parse_identifier(name)
            }
            Token::Char('(') => self.parse_nested(),
            other => Err(ParseError::ExpectedExpression(other.clone())),
        }
    }

    /// the current token as a binary operator, if it is one
    fn current_operator(&self) -> Option<(char, i32)> {
        let precedence = self.operator_precedence.token_precedence(self.current());
        match self.current() {
            Token::Char(op) if precedence > 0 => Some((*op, precedence)),
            _ => None,
        }
    }

    /// binoprhs ::= (binop primary)*
    ///
    /// folds operators binding at least as tightly as `expr_precedence` onto
    /// `lhs`, recursing only for operators that bind strictly tighter so equal
    /// precedence stays left associative
    pub fn parse_rhs(&mut self, expr_precedence: i32, lhs: Expression) -> ParseResult<Expression> {
        let mut result = lhs;

        loop {
            let (operator, precedence) = match self.current_operator() {
                Some((op, pr)) if pr >= expr_precedence => (op, pr),
                _ => return Ok(result),
            };
            self.advance();

            let mut rhs = self.parse_primary()?;

            if let Some((_, next_precedence)) = self.current_operator() {
                if precedence < next_precedence {
                    rhs = self.parse_rhs(precedence + 1, rhs)?;
                }
            }

            result = Expression::binary(operator, result, rhs);
        }
    }

    /// expression ::= primary binoprhs
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        let lhs = self.parse_primary()?;
        self.parse_rhs(0, lhs)
    }

    /// prototype ::= id '(' id* ')'
    pub fn parse_prototype(&mut self) -> ParseResult<Prototype> {
        let name = match self.current() {
            Token::Ident(name) => name.clone(),
            other => return Err(ParseError::ExpectedFunctionName(other.clone())),
        };
        self.advance();

        self.expect_char('(', ParseError::ExpectedPrototypeOpenParen)?;

        let mut args = Vec::new();
        while let Token::Ident(arg) = self.current() {
            args.push(arg.clone());
            self.advance();
        }

        self.expect_char(')', ParseError::ExpectedPrototypeCloseParen)?;

        Ok(Prototype { name, args })
    }

    /// definition ::= 'def' prototype expression
    pub fn parse_definition(&mut self) -> ParseResult<Function> {
        debug!("parsing definition");
        self.advance();
        let prototype = self.parse_prototype()?;
        let body = self.parse_expression()?;
        Ok(Function { prototype, body })
    }

    /// external ::= 'extern' prototype
    pub fn parse_extern(&mut self) -> ParseResult<Prototype> {
        debug!("parsing extern");
        self.advance();
        self.parse_prototype()
    }

    /// toplevelexpr ::= expression
    pub fn parse_top_level_expression(&mut self) -> ParseResult<Function> {
        debug!("parsing top-level expression");
        let body = self.parse_expression()?;
        Ok(Function {
            prototype: Prototype::anonymous(),
            body,
        })
    }
}
