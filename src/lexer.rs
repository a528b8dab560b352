//! Lexer for the clause and query language.
//!
//! Tokenizes identifiers and punctuation, skipping whitespace and `%`
//! line comments, and tracks line/column positions for error reports.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::token::{Location, Token};

/// Syntax error with source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct ReadError {
    /// Where the error was noticed.
    pub location: Location,
    /// Human-readable description.
    pub message: String,
}

impl ReadError {
    /// An error at `location`.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// Lexer over a source string.
#[derive(Debug)]
pub struct Lexer<'a> {
    file: String,
    chars: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    /// A lexer for `input`, reporting errors against `file`.
    pub fn new(file: impl Into<String>, input: &'a str) -> Self {
        Self {
            file: file.into(),
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// The current source location.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.file.clone(), self.line, self.column)
    }

    /// The next token and the location it starts at.
    ///
    /// # Errors
    ///
    /// Fails on characters outside the language.
    pub fn next_token(&mut self) -> Result<(Location, Token), ReadError> {
        self.skip_whitespace_and_comments();
        let location = self.location();

        let Some(&c) = self.chars.peek() else {
            return Ok((location, Token::Eof));
        };

        let token = match c {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            '.' => {
                self.advance();
                Token::Dot
            }
            ':' => {
                self.advance();
                if self.chars.peek() == Some(&'-') {
                    self.advance();
                    Token::Neck
                } else {
                    return Err(ReadError::new(location, "expected `-` after `:`"));
                }
            }
            c if c == '_' || c.is_alphanumeric() => self.read_identifier(),
            c => {
                return Err(ReadError::new(
                    location,
                    format!("unknown character `{c}`"),
                ));
            }
        };

        Ok((location, token))
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        match c {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        c
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('%') => {
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn read_identifier(&mut self) -> Token {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if name == "_" {
            return Token::Anonymous;
        }
        let first = name.chars().next().unwrap_or('_');
        if first == '_' || first.is_uppercase() {
            Token::Variable(name)
        } else {
            Token::Atom(name)
        }
    }
}
