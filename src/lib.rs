pub mod ast;
pub mod cursor;
pub mod driver;
pub mod lexer;
pub mod logger;
pub mod parser;
pub mod precedence;

pub use ast::{ASTNode, Expression, Function, Prototype};
pub use driver::Driver;
pub use lexer::{lex, Lexer, Token};
pub use parser::{ParseError, ParseResult, Parser};
pub use precedence::PrecedenceTable;
