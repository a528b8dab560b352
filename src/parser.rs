//! Recursive descent parser for clauses and queries.
//!
//! Produces the term and rule values the engine consumes; everything
//! the parser hands out has already passed name validation.

use crate::knowledge::Rule;
use crate::lexer::{Lexer, ReadError};
use crate::term::{Atom, Structure, Term, TermError, Variable};
use crate::token::{Location, Token};

/// Parser over a source string.
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    location: Location,
}

impl<'a> Parser<'a> {
    /// A parser for `input`, reporting errors against `file`.
    ///
    /// # Errors
    ///
    /// Fails if the input does not even lex.
    pub fn new(file: &str, input: &'a str) -> Result<Self, ReadError> {
        let mut lexer = Lexer::new(file, input);
        let (location, current) = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            location,
        })
    }

    /// Parse a single term.
    ///
    /// # Errors
    ///
    /// Fails on anything that is not an atom, variable, `_` or
    /// structure.
    pub fn parse_term(&mut self) -> Result<Term, ReadError> {
        match self.current.clone() {
            Token::Atom(name) => {
                let location = self.location.clone();
                self.advance()?;
                let functor = Atom::new(name).map_err(|error| invalid(location.clone(), &error))?;
                if self.current == Token::LParen {
                    let arguments = self.parse_arguments()?;
                    let structure = Structure::new(functor, arguments)
                        .map_err(|error| invalid(location, &error))?;
                    Ok(Term::Structure(structure))
                } else {
                    Ok(Term::Atom(functor))
                }
            }
            Token::Variable(name) => {
                let location = self.location.clone();
                self.advance()?;
                Variable::new(name)
                    .map(Term::Variable)
                    .map_err(|error| invalid(location, &error))
            }
            Token::Anonymous => {
                self.advance()?;
                Ok(Term::Anonymous)
            }
            found => Err(self.error(format!("expected a term, found `{found}`"))),
        }
    }

    /// Parse a term and require it to be a structure.
    ///
    /// # Errors
    ///
    /// Fails when the term is an atom, variable or `_`.
    pub fn parse_structure(&mut self) -> Result<Structure, ReadError> {
        let location = self.location.clone();
        match self.parse_term()? {
            Term::Structure(structure) => Ok(structure),
            term => Err(ReadError::new(
                location,
                format!("expected a structure, found `{term}`"),
            )),
        }
    }

    /// Parse one clause: `Head.` or `Head :- Goal, Goal, ... .`
    ///
    /// # Errors
    ///
    /// Fails on malformed clauses; the head must be a structure.
    pub fn parse_rule(&mut self) -> Result<Rule, ReadError> {
        let head = self.parse_structure()?;
        if self.current == Token::Neck {
            self.advance()?;
            let mut body = vec![self.parse_term()?];
            while self.current == Token::Comma {
                self.advance()?;
                body.push(self.parse_term()?);
            }
            self.expect(&Token::Dot)?;
            Ok(Rule::rule(head, body))
        } else {
            self.expect(&Token::Dot)?;
            Ok(Rule::fact(head))
        }
    }

    /// Parse clauses until end of input.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed clause.
    pub fn parse_rules(&mut self) -> Result<Vec<Rule>, ReadError> {
        let mut rules = Vec::new();
        while self.current != Token::Eof {
            rules.push(self.parse_rule()?);
        }
        Ok(rules)
    }

    /// Parse a query: a single structure, optionally ending with `.`.
    ///
    /// # Errors
    ///
    /// Fails when the query is not a structure or trailing input
    /// remains.
    pub fn parse_query(&mut self) -> Result<Structure, ReadError> {
        let query = self.parse_structure()?;
        if self.current == Token::Dot {
            self.advance()?;
        }
        if self.current != Token::Eof {
            return Err(self.error(format!(
                "unexpected input after query: `{}`",
                self.current
            )));
        }
        Ok(query)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Term>, ReadError> {
        self.expect(&Token::LParen)?;
        let mut arguments = vec![self.parse_term()?];
        while self.current == Token::Comma {
            self.advance()?;
            arguments.push(self.parse_term()?);
        }
        self.expect(&Token::RParen)?;
        Ok(arguments)
    }

    fn advance(&mut self) -> Result<(), ReadError> {
        let (location, token) = self.lexer.next_token()?;
        self.location = location;
        self.current = token;
        Ok(())
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ReadError> {
        if self.current == *expected {
            self.advance()
        } else {
            Err(self.error(format!(
                "expected `{expected}`, found `{}`",
                self.current
            )))
        }
    }

    fn error(&self, message: impl Into<String>) -> ReadError {
        ReadError::new(self.location.clone(), message)
    }
}

fn invalid(location: Location, error: &TermError) -> ReadError {
    ReadError::new(location, error.to_string())
}

/// Parse a complete rule listing, e.g. a consulted file.
///
/// # Errors
///
/// Fails on the first syntax error, with its location.
pub fn parse_rules(file: &str, input: &str) -> Result<Vec<Rule>, ReadError> {
    Parser::new(file, input)?.parse_rules()
}

/// Parse a single query structure.
///
/// # Errors
///
/// Fails on syntax errors and on queries that are not structures.
pub fn parse_query(file: &str, input: &str) -> Result<Structure, ReadError> {
    Parser::new(file, input)?.parse_query()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_facts_and_rules() {
        let rules = parse_rules(
            "test",
            "parent(tom, bob).
             descend(X, Y) :- parent(X, Z), descend(Z, Y).",
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        assert!(rules[0].is_fact());
        assert_eq!(rules[0].head().full_name(), "parent/2");
        assert_eq!(rules[1].goals().len(), 2);
        assert_eq!(rules[1].to_string(), "descend(X,Y) :- parent(X,Z), descend(Z,Y).");
    }

    #[test]
    fn test_parses_nested_structures_and_anonymous() {
        let query = parse_query("test", "route(city(a), city(B), _)").unwrap();
        assert_eq!(query.full_name(), "route/3");
        assert_eq!(query.to_string(), "route(city(a),city(B),_)");
    }

    #[test]
    fn test_query_accepts_optional_dot() {
        assert!(parse_query("test", "parent(tom, Who)").is_ok());
        assert!(parse_query("test", "parent(tom, Who).").is_ok());
    }

    #[test]
    fn test_query_must_be_a_structure() {
        let error = parse_query("test", "tom").unwrap_err();
        assert!(error.message.contains("expected a structure"));

        assert!(parse_query("test", "Who").is_err());
        assert!(parse_query("test", "_").is_err());
    }

    #[test]
    fn test_clause_head_must_be_a_structure() {
        let error = parse_rules("test", "tom.").unwrap_err();
        assert!(error.message.contains("expected a structure"));
    }

    #[test]
    fn test_missing_dot_is_reported_with_location() {
        let error = parse_rules("rules.pl", "parent(tom, bob)").unwrap_err();
        assert_eq!(error.location.file, "rules.pl");
        assert!(error.message.contains("expected `.`"));
    }

    #[test]
    fn test_error_locations_point_at_the_offending_token() {
        let error = parse_rules("test", "parent(tom,\n bob ann).").unwrap_err();
        assert_eq!(error.location.line, 2);
        assert_eq!(error.location.column, 6);
    }

    #[test]
    fn test_reserved_variable_prefix_is_rejected() {
        let error = parse_query("test", "parent(tom, _Ghost)").unwrap_err();
        assert!(error.message.contains("invalid variable name"));
    }

    #[test]
    fn test_empty_argument_list_is_rejected() {
        assert!(parse_query("test", "parent()").is_err());
    }

    #[test]
    fn test_trailing_input_after_query_is_rejected() {
        let error = parse_query("test", "parent(tom, bob). extra").unwrap_err();
        assert!(error.message.contains("unexpected input"));
    }
}
