//! The knowledge base: rules grouped into predicates.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::term::{Structure, Term};

/// Errors raised while building a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnowledgeError {
    /// A predicate needs at least one clause.
    #[error("predicates need at least one clause")]
    EmptyPredicate,
    /// All clauses sharing a head name must agree on arity.
    #[error("clauses for {name} disagree on arity: {expected} vs {found}")]
    InconsistentArity {
        /// The head name the clauses share.
        name: String,
        /// Arity of the first clause seen for the name.
        expected: usize,
        /// The conflicting arity.
        found: usize,
    },
}

/// A Horn clause: a head structure, optionally implied by body goals.
///
/// A fact has no body (`parent(tom, bob).`); a rule's body goals are
/// proved left to right (`descend(X, Y) :- parent(X, Y).`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    head: Structure,
    body: Option<Vec<Term>>,
}

impl Rule {
    /// A fact: a clause with no body.
    #[must_use]
    pub fn fact(head: Structure) -> Self {
        Self { head, body: None }
    }

    /// A rule whose head holds when all body goals are proved. An empty
    /// body is normalized to a fact.
    #[must_use]
    pub fn rule(head: Structure, body: Vec<Term>) -> Self {
        Self {
            head,
            body: if body.is_empty() { None } else { Some(body) },
        }
    }

    /// The clause head.
    #[must_use]
    pub fn head(&self) -> &Structure {
        &self.head
    }

    /// The body goals, in proof order; empty for facts.
    #[must_use]
    pub fn goals(&self) -> &[Term] {
        self.body.as_deref().unwrap_or(&[])
    }

    /// Whether this clause has no body.
    #[must_use]
    pub fn is_fact(&self) -> bool {
        self.body.is_none()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if let Some(body) = &self.body {
            f.write_str(" :- ")?;
            for (i, goal) in body.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{goal}")?;
            }
        }
        f.write_str(".")
    }
}

/// All clauses sharing one head name and arity, in declaration order.
///
/// Declaration order is what determines the order in which solutions
/// are enumerated, so it is preserved exactly.
#[derive(Debug, Clone)]
pub struct Predicate {
    name: String,
    arity: usize,
    clauses: Vec<Rule>,
}

impl Predicate {
    /// Build a predicate from its clauses.
    ///
    /// # Errors
    ///
    /// Fails when `clauses` is empty or the clause heads disagree on
    /// name or arity.
    pub fn new(clauses: Vec<Rule>) -> Result<Self, KnowledgeError> {
        let Some(first) = clauses.first() else {
            return Err(KnowledgeError::EmptyPredicate);
        };
        let name = first.head().name().to_string();
        let arity = first.head().arity();
        for clause in &clauses {
            if clause.head().name() != name || clause.head().arity() != arity {
                return Err(KnowledgeError::InconsistentArity {
                    name,
                    expected: arity,
                    found: clause.head().arity(),
                });
            }
        }
        Ok(Self {
            name,
            arity,
            clauses,
        })
    }

    /// The shared head name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared head arity.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The `name/arity` lookup key.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.name, self.arity)
    }

    /// The clauses, in declaration order.
    #[must_use]
    pub fn clauses(&self) -> &[Rule] {
        &self.clauses
    }
}

/// A knowledge base: predicates keyed by `name/arity`.
///
/// Built once from the full clause list and read-only afterwards; one
/// knowledge base can back any number of search trees.
#[derive(Debug, Clone)]
pub struct Knowledge {
    predicates: IndexMap<String, Predicate>,
}

impl Knowledge {
    /// Group an ordered list of rules into predicates.
    ///
    /// Relative clause order within each predicate is preserved.
    ///
    /// # Errors
    ///
    /// Fails when two rules share a head name but disagree on arity.
    pub fn new(rules: Vec<Rule>) -> Result<Self, KnowledgeError> {
        let mut groups: IndexMap<String, Vec<Rule>> = IndexMap::new();
        for rule in rules {
            let name = rule.head().name().to_string();
            if let Some(group) = groups.get(&name) {
                let expected = group[0].head().arity();
                if rule.head().arity() != expected {
                    return Err(KnowledgeError::InconsistentArity {
                        name,
                        expected,
                        found: rule.head().arity(),
                    });
                }
            }
            groups.entry(name).or_default().push(rule);
        }

        let mut predicates = IndexMap::new();
        for (_, group) in groups {
            let predicate = Predicate::new(group)?;
            predicates.insert(predicate.full_name(), predicate);
        }
        Ok(Self { predicates })
    }

    /// The predicate stored under a `name/arity` key. Absence is a
    /// normal outcome: the search treats it as a goal with no matching
    /// clauses.
    #[must_use]
    pub fn predicate(&self, full_name: &str) -> Option<&Predicate> {
        self.predicates.get(full_name)
    }

    /// [`Knowledge::predicate`] with name and arity supplied separately.
    #[must_use]
    pub fn lookup(&self, name: &str, arity: usize) -> Option<&Predicate> {
        self.predicates.get(&format!("{name}/{arity}"))
    }

    /// The predicates, in first-declaration order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.values()
    }

    /// Number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether the knowledge base has no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Display for Knowledge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for predicate in self.predicates.values() {
            writeln!(f, "{}:", predicate.full_name())?;
            for clause in predicate.clauses() {
                writeln!(f, "\t{clause}")?;
            }
        }
        Ok(())
    }
}
