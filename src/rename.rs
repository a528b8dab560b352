//! Fresh-variable renaming for capture-free clause instantiation.
//!
//! Every clause attempt works on a copy of the clause whose variables
//! have been replaced by globally unique internal variables, so the
//! same clause can take part in many resolution steps of one search
//! without its variables capturing each other.

use crate::frame::Frame;
use crate::term::{Structure, Term, Variable};

/// Name prefix reserved for internally generated variables. The parser
/// rejects user variables carrying it, which is what makes the
/// prefix check in [`Renamer`] sound.
pub const GENERATED_PREFIX: &str = "_G";

/// Mints globally unique internal variables: `_G0`, `_G1`, ...
///
/// One generator is threaded through all renaming done for a single
/// search tree; the counter only ever grows.
#[derive(Debug, Default)]
pub struct VarGenerator {
    counter: u64,
}

impl VarGenerator {
    /// A generator starting at `_G0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The next unused internal variable.
    pub fn fresh(&mut self) -> Variable {
        let variable = Variable::generated(self.counter);
        self.counter += 1;
        variable
    }
}

/// Replaces the named variables of a term by fresh internal variables.
///
/// Repeated occurrences of one source variable map to the same fresh
/// variable through the tracking frame, which also lets one renamer
/// invocation for a clause head and a later one for its body agree on
/// names. Variables that already carry the reserved prefix are left
/// alone, so terms copied from node to node are never renamed twice.
#[derive(Debug)]
pub struct Renamer<'a> {
    variables: &'a mut VarGenerator,
    tracking: &'a mut Frame,
}

impl<'a> Renamer<'a> {
    /// A renamer recording its replacements in `tracking`.
    pub fn new(variables: &'a mut VarGenerator, tracking: &'a mut Frame) -> Self {
        Self {
            variables,
            tracking,
        }
    }

    /// A structurally identical term with fresh variable names.
    pub fn rename_term(&mut self, term: &Term) -> Term {
        match term {
            Term::Variable(variable) if !variable.is_generated() => {
                if let Some(renamed) = self.tracking.lookup(variable) {
                    return renamed.clone();
                }
                let fresh = Term::Variable(self.variables.fresh());
                self.tracking.bind(variable.clone(), fresh.clone());
                fresh
            }
            Term::Structure(structure) => Term::Structure(self.rename_structure(structure)),
            Term::Variable(_) | Term::Atom(_) | Term::Anonymous => term.clone(),
        }
    }

    /// [`Renamer::rename_term`] over a structure, keeping the functor.
    pub fn rename_structure(&mut self, structure: &Structure) -> Structure {
        Structure::remap(
            structure.functor().clone(),
            structure
                .arguments()
                .iter()
                .map(|argument| self.rename_term(argument))
                .collect(),
        )
    }

    /// [`Renamer::rename_term`] over a list of terms.
    pub fn rename_all(&mut self, terms: &[Term]) -> Vec<Term> {
        terms.iter().map(|term| self.rename_term(term)).collect()
    }
}
