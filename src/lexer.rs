use std::fmt;

use log::{trace, warn};

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,
    Def,
    Extern,
    Ident(String),
    Number(f64),
    /// any other single character, including `(`, `)` and `,`
    Char(char),
}

impl Token {
    pub fn is_char(&self, c: char) -> bool {
        *self == Token::Char(c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Def => write!(f, "'def'"),
            Token::Extern => write!(f, "'extern'"),
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Number(value) => write!(f, "number {}", value),
            Token::Char(c) => write!(f, "'{}'", c),
        }
    }
}

/// character level lexer with a single character of lookahead
///
/// `last_char` holds the character following the token just produced, `None`
/// once the input is exhausted.
#[derive(Debug)]
pub struct Lexer<I> {
    input: I,
    last_char: Option<char>,
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(input: I) -> Self {
        // a blank lookahead gets skipped, so nothing is read until the first token is asked for
        Self {
            input,
            last_char: Some(' '),
        }
    }

    fn bump(&mut self) {
        self.last_char = self.input.next();
    }

    pub fn next_token(&mut self) -> Token {
        let token = self.lex_token();
        trace!("lexed {}", token);
        token
    }

    fn lex_token(&mut self) -> Token {
        loop {
            while matches!(self.last_char, Some(c) if is_space(c)) {
                self.bump();
            }

            let c = match self.last_char {
                Some(c) => c,
                None => return Token::Eof,
            };

            if c.is_ascii_alphabetic() {
                let mut ident = String::new();
                while let Some(c) = self.last_char.filter(char::is_ascii_alphanumeric) {
                    ident.push(c);
                    self.bump();
                }
                return match ident.as_str() {
                    "def" => Token::Def,
                    "extern" => Token::Extern,
                    _ => Token::Ident(ident),
                };
            }

            if c.is_ascii_digit() || c == '.' {
                let mut literal = String::new();
                while let Some(c) = self.last_char.filter(|c| c.is_ascii_digit() || *c == '.') {
                    literal.push(c);
                    self.bump();
                }
                return Token::Number(parse_number(&literal));
            }

            if c == '#' {
                while !matches!(self.last_char, None | Some('\n') | Some('\r')) {
                    self.bump();
                }
                continue;
            }

            self.bump();
            return Token::Char(c);
        }
    }
}

impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// value of the longest prefix of `literal` that is a valid float, like strtod
///
/// the lexer accepts any run of digits and dots, so `1.2.3` becomes `1.2` and a
/// lone `.` becomes `0`
fn parse_number(literal: &str) -> f64 {
    for end in (1..=literal.len()).rev() {
        if let Ok(value) = literal[..end].parse() {
            if end < literal.len() {
                warn!(
                    "numeric literal '{}' truncated to '{}'",
                    literal,
                    &literal[..end]
                );
            }
            return value;
        }
    }
    warn!("numeric literal '{}' has no digits, using 0", literal);
    0.0
}

/// lex the whole string, stopping before end of input
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input.chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> Token {
        Token::Ident(name.to_string())
    }

    #[test]
    fn lex_works() {
        let input = "def add(x y) x+1.0;";
        let tokenized = vec![
            Token::Def,
            ident("add"),
            Token::Char('('),
            ident("x"),
            ident("y"),
            Token::Char(')'),
            ident("x"),
            Token::Char('+'),
            Token::Number(1.0),
            Token::Char(';'),
        ];
        assert_eq!(lex(input), tokenized);
    }

    #[test]
    fn numbers_parse_as_decimal() {
        assert_eq!(lex("3.14"), vec![Token::Number(3.14)]);
        assert_eq!(lex("42 .5 7."), vec![
            Token::Number(42.0),
            Token::Number(0.5),
            Token::Number(7.0),
        ]);
    }

    #[test]
    fn malformed_numbers_keep_longest_valid_prefix() {
        assert_eq!(lex("1.2.3"), vec![Token::Number(1.2)]);
        assert_eq!(lex("."), vec![Token::Number(0.0)]);
    }

    #[test]
    fn identifiers_keep_exact_text() {
        assert_eq!(lex("foo1"), vec![ident("foo1")]);
        assert_eq!(lex("Def EXTERN define"), vec![
            ident("Def"),
            ident("EXTERN"),
            ident("define"),
        ]);
        assert_eq!(lex("def extern"), vec![Token::Def, Token::Extern]);
    }

    #[test]
    fn identifier_stops_at_non_alphanumeric() {
        assert_eq!(lex("a_b"), vec![ident("a"), Token::Char('_'), ident("b")]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(lex("1 # comment\n2"), lex("1\n2"));
        assert_eq!(lex("1 # comment\n2"), vec![Token::Number(1.0), Token::Number(2.0)]);
        assert_eq!(lex("# only a comment"), Vec::<Token>::new());
        assert_eq!(lex("x # comment\r\ny"), vec![ident("x"), ident("y")]);
    }

    #[test]
    fn unknown_characters_become_char_tokens() {
        assert_eq!(lex("@ < !"), vec![
            Token::Char('@'),
            Token::Char('<'),
            Token::Char('!'),
        ]);
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("x".chars());
        assert_eq!(lexer.next_token(), ident("x"));
        assert_eq!(lexer.next_token(), Token::Eof);
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn lexing_is_repeatable() {
        let input = "def f(a) a*2 # twice\nf(3.5);";
        assert_eq!(lex(input), lex(input));
    }
}
