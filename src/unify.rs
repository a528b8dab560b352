//! Structural unification of terms under a substitution frame.

use log::trace;

use crate::frame::Frame;
use crate::term::{Structure, Term, Variable};

/// Try to unify two terms, binding variables as needed.
///
/// The input frame is never modified: on success a new frame is
/// returned (equal to the input if no new bindings were needed), on
/// failure `None`. Failure is the ordinary outcome of trying a clause
/// that does not apply, not an error.
///
/// No occurs-check is performed: a variable may be bound to a term
/// containing that same variable, which is the classical simplification
/// also taken by the source language this engine interprets.
#[must_use]
pub fn unify(frame: &Frame, a: &Term, b: &Term) -> Option<Frame> {
    // Structurally equal terms need no new bindings.
    if a == b {
        return Some(frame.clone());
    }

    match (a, b) {
        // The anonymous variable matches anything and is never bound.
        (Term::Anonymous, _) | (_, Term::Anonymous) => Some(frame.clone()),
        (Term::Variable(variable), other) | (other, Term::Variable(variable)) => {
            unify_variable(frame, variable, other)
        }
        (Term::Structure(a), Term::Structure(b)) => unify_structures(frame, a, b),
        // Unequal atoms, or mixed atom/structure: no substitution helps.
        _ => None,
    }
}

fn unify_variable(frame: &Frame, variable: &Variable, term: &Term) -> Option<Frame> {
    if let Some(binding) = frame.lookup(variable) {
        // Dereference: chains of bindings resolve by re-unifying the
        // binding against the other side.
        return unify(frame, binding, term);
    }
    trace!("bind {variable} -> {term}");
    Some(frame.extended(variable.clone(), term.clone()))
}

fn unify_structures(frame: &Frame, a: &Structure, b: &Structure) -> Option<Frame> {
    if a.functor() != b.functor() || a.arity() != b.arity() {
        return None;
    }
    // Thread the frame left to right so each argument sees the bindings
    // made by the previous ones; any failure discards the partial frame.
    let mut frame = frame.clone();
    for (x, y) in a.arguments().iter().zip(b.arguments()) {
        frame = unify(&frame, x, y)?;
    }
    Some(frame)
}
