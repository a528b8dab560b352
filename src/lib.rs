//! # Hornlog
//!
//! A small Horn clause resolution engine in Rust.
//!
//! ## Features
//!
//! - Facts and rules over first-order terms
//! - Unification with variable dereferencing
//! - Lazy, resumable depth-first solution enumeration (SLD resolution)
//! - DOT export of the search tree
//!
//! ## Example
//!
//! ```rust
//! use hornlog::{parse_query, parse_rules, Knowledge, SearchTree};
//!
//! let rules = parse_rules(
//!     "kb",
//!     "parent(tom, bob).
//!      parent(bob, ann).
//!      descend(X, Y) :- parent(X, Y).
//!      descend(X, Y) :- parent(X, Z), descend(Z, Y).",
//! )
//! .unwrap();
//! let knowledge = Knowledge::new(rules).unwrap();
//!
//! let query = parse_query("query", "descend(tom, Who)").unwrap();
//! let mut tree = SearchTree::new(&knowledge, &query);
//! assert_eq!(tree.search_one().unwrap().to_string(), "{Who = bob}");
//! assert_eq!(tree.search_one().unwrap().to_string(), "{Who = ann}");
//! assert!(tree.search_one().is_none());
//! ```

/// Term model: atoms, variables and structures.
pub mod term;

/// Substitution frames.
pub mod frame;

/// Unification.
pub mod unify;

/// Fresh-variable renaming.
pub mod rename;

/// Rules, predicates and the knowledge base.
pub mod knowledge;

/// The resolution search tree.
pub mod search;

/// DOT export of search trees.
pub mod graph;

/// Tokens and source locations.
pub mod token;

/// Lexer for the clause and query language.
pub mod lexer;

/// Parser for clauses and queries.
pub mod parser;

/// Interactive front end.
pub mod repl;

pub use frame::Frame;
pub use graph::to_dot;
pub use knowledge::{Knowledge, KnowledgeError, Predicate, Rule};
pub use lexer::{Lexer, ReadError};
pub use parser::{parse_query, parse_rules, Parser};
pub use rename::{Renamer, VarGenerator, GENERATED_PREFIX};
pub use repl::Repl;
pub use search::SearchTree;
pub use term::{Atom, Structure, Term, TermError, Variable};
pub use token::{Location, Token};
pub use unify::unify;
