use crate::lexer::{Lexer, Token};

/// one token buffer between the lexer and the parser
///
/// The parser only ever looks at `current`, so every grammar decision is made
/// with a single token of lookahead.
#[derive(Debug)]
pub struct TokenCursor<I> {
    lexer: Lexer<I>,
    current: Token,
}

impl<I: Iterator<Item = char>> TokenCursor<I> {
    /// primes the cursor with the first token of `lexer`
    pub fn new(mut lexer: Lexer<I>) -> Self {
        let current = lexer.next_token();
        Self { lexer, current }
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn advance(&mut self) -> &Token {
        self.current = self.lexer.next_token();
        &self.current
    }

    /// replaces the current token with the next one and returns the old one
    pub fn take(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }
}
