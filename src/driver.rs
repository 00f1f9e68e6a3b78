use std::str::Chars;

use log::debug;

use crate::ast::ASTNode;
use crate::lexer::Token;
use crate::parser::{ParseResult, Parser};

/// top ::= definition | external | expression | ';'
///
/// Yields one item per top-level unit until end of input. After a failed unit
/// exactly one token is skipped before resuming, which guarantees progress but
/// not a clean resynchronization point.
#[derive(Debug)]
pub struct Driver<I> {
    parser: Parser<I>,
}

impl<'a> Driver<Chars<'a>> {
    pub fn from_str(source: &'a str) -> Self {
        Self::new(Parser::from_str(source))
    }
}

impl<I: Iterator<Item = char>> Driver<I> {
    pub fn new(parser: Parser<I>) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &Parser<I> {
        &self.parser
    }

    fn parse_unit(&mut self) -> Option<ParseResult<ASTNode>> {
        loop {
            let res = match self.parser.current() {
                Token::Eof => return None,
                Token::Char(';') => {
                    self.parser.advance();
                    continue;
                }
                Token::Def => self.parser.parse_definition().map(ASTNode::Function),
                Token::Extern => self.parser.parse_extern().map(ASTNode::Extern),
                _ => self.parser.parse_top_level_expression().map(ASTNode::Function),
            };
            return Some(res);
        }
    }

    /// parse everything left, keeping units and errors in input order
    pub fn parse_program(self) -> Vec<ParseResult<ASTNode>> {
        self.collect()
    }
}

impl<I: Iterator<Item = char>> Iterator for Driver<I> {
    type Item = ParseResult<ASTNode>;

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.parse_unit()?;
        if let Err(err) = &res {
            debug!("skipping {} after error: {}", self.parser.current(), err);
            self.parser.advance();
        }
        Some(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Function, Prototype};
    use crate::parser::ParseError;
    use pretty_assertions::assert_eq;

    fn anonymous(body: Expression) -> ASTNode {
        ASTNode::Function(Function {
            prototype: Prototype::anonymous(),
            body,
        })
    }

    #[test]
    fn parses_a_program() {
        let source = "
            # declarations
            extern sin(x);
            def double(x) x * 2;
            double(sin(1));
        ";
        let units = Driver::from_str(source).parse_program();
        assert_eq!(
            units,
            vec![
                Ok(ASTNode::Extern(Prototype {
                    name: "sin".to_string(),
                    args: vec!["x".to_string()],
                })),
                Ok(ASTNode::Function(Function {
                    prototype: Prototype {
                        name: "double".to_string(),
                        args: vec!["x".to_string()],
                    },
                    body: Expression::binary(
                        '*',
                        Expression::Variable("x".to_string()),
                        Expression::Number(2.0)
                    ),
                })),
                Ok(anonymous(Expression::Call(
                    "double".to_string(),
                    vec![Expression::Call("sin".to_string(), vec![Expression::Number(1.0)])]
                ))),
            ]
        );
    }

    #[test]
    fn semicolons_and_empty_input_yield_nothing() {
        assert!(Driver::from_str("").parse_program().is_empty());
        assert!(Driver::from_str(";;; # nothing\n;").parse_program().is_empty());
    }

    #[test]
    fn lone_def_fails_and_terminates() {
        let mut driver = Driver::from_str("def");
        assert_eq!(
            driver.next(),
            Some(Err(ParseError::ExpectedFunctionName(Token::Eof)))
        );
        assert_eq!(driver.next(), None);
    }

    #[test]
    fn recovery_skips_exactly_one_token() {
        let mut driver = Driver::from_str("def 1 2; 3");
        assert_eq!(
            driver.next(),
            Some(Err(ParseError::ExpectedFunctionName(Token::Number(1.0))))
        );
        assert_eq!(driver.parser().current(), &Token::Number(2.0));
        assert_eq!(driver.next(), Some(Ok(anonymous(Expression::Number(2.0)))));
        assert_eq!(driver.next(), Some(Ok(anonymous(Expression::Number(3.0)))));
        assert_eq!(driver.next(), None);
    }

    #[test]
    fn recovery_does_not_resynchronize() {
        // skipping ',' leaves 'b' to be read as its own expression
        let units = Driver::from_str("extern f(a, b); 4").parse_program();
        assert_eq!(
            units,
            vec![
                Err(ParseError::ExpectedPrototypeCloseParen(Token::Char(','))),
                Ok(anonymous(Expression::Variable("b".to_string()))),
                Err(ParseError::ExpectedExpression(Token::Char(')'))),
                Ok(anonymous(Expression::Number(4.0))),
            ]
        );
    }
}
