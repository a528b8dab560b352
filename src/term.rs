//! Term model for Horn clauses.
//!
//! Terms are immutable values: atoms, named variables, the anonymous
//! variable and compound structures. Every transformation on terms
//! (renaming, resolution against a frame) builds a new term tree, so
//! sub-terms can be shared freely across clauses and search branches.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rename::GENERATED_PREFIX;

/// Errors raised when a term is constructed from invalid parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// Atom names start with a lowercase letter or a digit.
    #[error("invalid atom name: {0:?}")]
    InvalidAtomName(String),
    /// Variable names start with an uppercase letter or `_`; the `_G`
    /// prefix is reserved for internally generated variables.
    #[error("invalid variable name: {0:?}")]
    InvalidVariableName(String),
    /// Zero-argument structures do not occur; use an [`Atom`] instead.
    #[error("structures take at least one argument, use an atom instead")]
    EmptyStructure,
}

/// A nullary named constant, e.g. `tom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Atom {
    name: String,
}

impl Atom {
    /// Create an atom, validating the name.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::InvalidAtomName`] unless the name is a
    /// non-empty identifier starting with a lowercase letter or digit.
    pub fn new(name: impl Into<String>) -> Result<Self, TermError> {
        let name = name.into();
        if !is_atom_name(&name) {
            return Err(TermError::InvalidAtomName(name));
        }
        Ok(Self { name })
    }

    /// The atom's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A named logical variable, e.g. `Who`. Equality is by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Create a variable, validating the name.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::InvalidVariableName`] unless the name is a
    /// non-empty identifier starting with an uppercase letter or `_`.
    /// A bare `_` is rejected (that is the anonymous variable, not a
    /// named one), as is the reserved `_G` prefix.
    pub fn new(name: impl Into<String>) -> Result<Self, TermError> {
        let name = name.into();
        if !is_variable_name(&name) {
            return Err(TermError::InvalidVariableName(name));
        }
        Ok(Self { name })
    }

    /// Internal variable `_G<index>`. Only minted by the renamer.
    pub(crate) fn generated(index: u64) -> Self {
        Self {
            name: format!("{GENERATED_PREFIX}{index}"),
        }
    }

    /// The variable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this variable carries the reserved internal prefix.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.name.starts_with(GENERATED_PREFIX)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A compound term: a functor applied to one or more arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Structure {
    functor: Atom,
    arguments: Vec<Term>,
}

impl Structure {
    /// Create a structure.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::EmptyStructure`] if `arguments` is empty.
    pub fn new(functor: Atom, arguments: Vec<Term>) -> Result<Self, TermError> {
        if arguments.is_empty() {
            return Err(TermError::EmptyStructure);
        }
        Ok(Self { functor, arguments })
    }

    /// Rebuild a structure from an existing one's parts. Callers
    /// preserve the argument count, so no re-validation happens.
    pub(crate) fn remap(functor: Atom, arguments: Vec<Term>) -> Self {
        Self { functor, arguments }
    }

    /// The functor atom.
    #[must_use]
    pub fn functor(&self) -> &Atom {
        &self.functor
    }

    /// The functor's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.functor.name()
    }

    /// Number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// The argument terms, in order.
    #[must_use]
    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }

    /// The `name/arity` key this structure resolves against.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.name(), self.arity())
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.functor)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{argument}")?;
        }
        f.write_str(")")
    }
}

/// A first-order term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// A named constant.
    Atom(Atom),
    /// A named logical variable.
    Variable(Variable),
    /// The anonymous variable `_`: unifies with anything, is never
    /// bound, and all occurrences are mutually equal.
    Anonymous,
    /// A compound term.
    Structure(Structure),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(atom) => write!(f, "{atom}"),
            Term::Variable(variable) => write!(f, "{variable}"),
            Term::Anonymous => f.write_str("_"),
            Term::Structure(structure) => write!(f, "{structure}"),
        }
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Atom(atom)
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Term::Variable(variable)
    }
}

impl From<Structure> for Term {
    fn from(structure: Structure) -> Self {
        Term::Structure(structure)
    }
}

fn is_atom_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() || first.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_variable_name(name: &str) -> bool {
    if name == "_" || name.starts_with(GENERATED_PREFIX) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
