use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::lexer::Token;

lazy_static! {
    // 1 is the lowest precedence
    static ref DEFAULT_PRECEDENCE: HashMap<char, i32> = {
        let mut operator_precedence = HashMap::new();
        operator_precedence.insert('<', 10);
        operator_precedence.insert('+', 20);
        operator_precedence.insert('-', 30);
        operator_precedence.insert('*', 40);
        operator_precedence
    };
}

/// binary operator precedence, higher binds tighter
#[derive(Debug, Clone, PartialEq)]
pub struct PrecedenceTable {
    operators: HashMap<char, i32>,
}

impl std::default::Default for PrecedenceTable {
    fn default() -> Self {
        Self {
            operators: DEFAULT_PRECEDENCE.clone(),
        }
    }
}

impl PrecedenceTable {
    /// a table with no binary operators at all
    pub fn empty() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    pub fn insert(&mut self, op: char, precedence: i32) -> Option<i32> {
        self.operators.insert(op, precedence)
    }

    pub fn remove(&mut self, op: char) -> Option<i32> {
        self.operators.remove(&op)
    }

    /// precedence of `op`, or -1 if it is not a binary operator
    pub fn get(&self, op: char) -> i32 {
        match self.operators.get(&op) {
            Some(&precedence) if precedence > 0 => precedence,
            _ => -1,
        }
    }

    pub fn token_precedence(&self, token: &Token) -> i32 {
        match token {
            Token::Char(op) => self.get(*op),
            _ => -1,
        }
    }
}
