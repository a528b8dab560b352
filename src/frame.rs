//! Substitution frames: persistent variable-to-term bindings.
//!
//! A frame is extended by copying, never by mutating a frame another
//! search branch still holds, so every branch of the search tree keeps
//! an independent view of its bindings.

use std::fmt;

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::term::{Structure, Term, Variable};

/// A mapping from variables to their current bindings, in insertion
/// order.
///
/// A binding may itself contain further bound variables; chains are not
/// collapsed on insert. [`Frame::resolve`] walks them when a concrete
/// term is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    bindings: IndexMap<Variable, Term>,
}

impl Frame {
    /// An empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The binding of `variable`, if any. The result may itself contain
    /// bound variables.
    #[must_use]
    pub fn lookup(&self, variable: &Variable) -> Option<&Term> {
        self.bindings.get(variable)
    }

    /// Bind `variable` in place. Only valid for frames no other search
    /// branch has derived from; shared frames are grown with
    /// [`Frame::extended`] instead.
    pub fn bind(&mut self, variable: Variable, term: Term) {
        self.bindings.insert(variable, term);
    }

    /// A new frame equal to this one plus one binding. The receiver is
    /// left untouched, so frames already visible to other branches stay
    /// valid.
    #[must_use]
    pub fn extended(&self, variable: Variable, term: Term) -> Self {
        let mut bindings = self.bindings.clone();
        bindings.insert(variable, term);
        Self { bindings }
    }

    /// The bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter()
    }

    /// A copy of `term` with every bound variable replaced by its fully
    /// resolved binding, following chains of bindings transitively.
    /// Unbound variables and the anonymous variable pass through.
    #[must_use]
    pub fn resolve(&self, term: &Term) -> Term {
        match term {
            Term::Variable(variable) => match self.lookup(variable) {
                Some(binding) => self.resolve(binding),
                None => term.clone(),
            },
            Term::Structure(structure) => Term::Structure(Structure::remap(
                structure.functor().clone(),
                structure
                    .arguments()
                    .iter()
                    .map(|argument| self.resolve(argument))
                    .collect(),
            )),
            Term::Atom(_) | Term::Anonymous => term.clone(),
        }
    }

    /// [`Frame::resolve`] applied to a list of terms.
    #[must_use]
    pub fn resolve_all(&self, terms: &[Term]) -> Vec<Term> {
        terms.iter().map(|term| self.resolve(term)).collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (variable, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable} = {term}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Atom;

    fn atom(name: &str) -> Term {
        Term::Atom(Atom::new(name).unwrap())
    }

    fn var(name: &str) -> Variable {
        Variable::new(name).unwrap()
    }

    #[test]
    fn test_extended_leaves_the_original_untouched() {
        let base = Frame::new().extended(var("X"), atom("a"));
        let grown = base.extended(var("Y"), atom("b"));

        assert_eq!(base.len(), 1);
        assert_eq!(grown.len(), 2);
        assert_eq!(base.lookup(&var("Y")), None);
        assert_eq!(grown.lookup(&var("X")), Some(&atom("a")));
    }

    #[test]
    fn test_sibling_extensions_do_not_interfere() {
        let base = Frame::new().extended(var("X"), atom("a"));
        let left = base.extended(var("Y"), atom("left"));
        let right = base.extended(var("Y"), atom("right"));

        assert_eq!(left.lookup(&var("Y")), Some(&atom("left")));
        assert_eq!(right.lookup(&var("Y")), Some(&atom("right")));
        assert_eq!(base.lookup(&var("Y")), None);
    }

    #[test]
    fn test_resolve_follows_binding_chains() {
        let mut frame = Frame::new();
        frame.bind(var("X"), Term::Variable(var("Y")));
        frame.bind(var("Y"), Term::Variable(var("Z")));
        frame.bind(var("Z"), atom("end"));

        assert_eq!(frame.resolve(&Term::Variable(var("X"))), atom("end"));
    }

    #[test]
    fn test_resolve_descends_into_structures() {
        let mut frame = Frame::new();
        frame.bind(var("X"), atom("a"));

        let term = Term::Structure(
            Structure::new(
                Atom::new("pair").unwrap(),
                vec![Term::Variable(var("X")), Term::Variable(var("Free"))],
            )
            .unwrap(),
        );
        let resolved = frame.resolve(&term);
        assert_eq!(resolved.to_string(), "pair(a,Free)");
    }

    #[test]
    fn test_resolve_passes_anonymous_through() {
        let frame = Frame::new().extended(var("X"), atom("a"));
        assert_eq!(frame.resolve(&Term::Anonymous), Term::Anonymous);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut frame = Frame::new();
        frame.bind(var("B"), atom("1st"));
        frame.bind(var("A"), atom("2nd"));

        let names: Vec<&str> = frame.iter().map(|(variable, _)| variable.name()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
