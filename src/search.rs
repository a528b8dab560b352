//! Resumable depth-first resolution search.
//!
//! The search is an explicit tree of proof states with a cursor into
//! the currently active node, not a recursive function: that is what
//! lets [`SearchTree::search_one`] hand back exactly one solution and
//! later resume from the same spot without re-deriving anything. The
//! node tree is retained, so a finished or suspended search can still
//! be projected into a diagram (see [`crate::graph`]).

use log::debug;
use smallvec::SmallVec;

use crate::frame::Frame;
use crate::knowledge::{Knowledge, Rule};
use crate::rename::{Renamer, VarGenerator};
use crate::term::{Structure, Term};
use crate::unify::unify;

pub(crate) type NodeId = usize;

/// Goal lists are short in practice; keep them inline.
type GoalList = SmallVec<[Term; 8]>;

/// One proof state: a substitution frame, the goals still to prove and
/// a position within the applicable predicate's clauses.
#[derive(Debug)]
pub(crate) struct SearchNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) frame: Frame,
    pub(crate) goals: GoalList,
    /// `name/arity` of the leading goal; `None` when the goal list is
    /// empty or the leading goal is not a structure.
    predicate: Option<String>,
    clause_count: usize,
    next_clause: usize,
    /// Bookkeeping for introspection only; control always moves
    /// straight to a newly created child.
    pub(crate) children: Vec<NodeId>,
}

/// A depth-first, backtracking, resumable search for solutions of one
/// query against a knowledge base.
///
/// ```rust
/// use hornlog::{parse_query, parse_rules, Knowledge, SearchTree};
///
/// let rules = parse_rules("kb", "parent(tom, bob). parent(bob, ann).").unwrap();
/// let knowledge = Knowledge::new(rules).unwrap();
/// let query = parse_query("query", "parent(tom, Who)").unwrap();
///
/// let mut tree = SearchTree::new(&knowledge, &query);
/// let solution = tree.search_one().unwrap();
/// assert_eq!(solution.to_string(), "{Who = bob}");
/// assert!(tree.search_one().is_none());
/// ```
#[derive(Debug)]
pub struct SearchTree<'k> {
    knowledge: &'k Knowledge,
    variables: VarGenerator,
    nodes: Vec<SearchNode>,
    /// The node currently holding control; `None` once the search is
    /// exhausted.
    current: Option<NodeId>,
    /// Original query variable -> internal variable, kept to project
    /// solution frames back onto the user's names.
    query_frame: Frame,
}

impl<'k> SearchTree<'k> {
    /// Start a search for `query`. The query's free variables are
    /// renamed to internal variables once, here; solutions are keyed by
    /// the original names again.
    #[must_use]
    pub fn new(knowledge: &'k Knowledge, query: &Structure) -> Self {
        let mut variables = VarGenerator::new();
        let mut query_frame = Frame::new();
        let renamed =
            Renamer::new(&mut variables, &mut query_frame).rename_structure(query);

        let mut tree = Self {
            knowledge,
            variables,
            nodes: Vec::new(),
            current: None,
            query_frame,
        };
        let root = tree.push_node(
            None,
            Frame::new(),
            std::iter::once(Term::Structure(renamed)).collect(),
        );
        tree.current = Some(root);
        tree
    }

    /// Search until the next solution.
    ///
    /// Returns the solution frame filtered to the query's original
    /// variables; an empty frame means the query was proved without
    /// free variables. `None` means the search space is exhausted, and
    /// every later call returns `None` again without doing any work.
    pub fn search_one(&mut self) -> Option<Frame> {
        while let Some(node) = self.current {
            if let Some(frame) = self.step(node) {
                return Some(self.project(&frame));
            }
        }
        None
    }

    /// Whether the search has run out of solutions.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// One unit of work at `id`: report a solution, descend into a
    /// child for the first clause that unifies, or backtrack.
    fn step(&mut self, id: NodeId) -> Option<Frame> {
        if self.nodes[id].goals.is_empty() {
            // Nothing left to prove: this frame is a solution. Control
            // moves to the parent so the next call resumes there.
            debug!("node {id}: solution");
            self.current = self.nodes[id].parent;
            return Some(self.nodes[id].frame.clone());
        }

        let goal = self.nodes[id].goals[0].clone();
        while let Some((clause, clause_index)) = self.next_clause(id) {
            // Rename the clause head under a tracking frame seeded with
            // this node's frame; resolving the body against the same
            // tracking frame gives head-shared variables their fresh
            // names.
            let mut tracking = self.nodes[id].frame.clone();
            let head = Term::Structure(
                Renamer::new(&mut self.variables, &mut tracking).rename_structure(clause.head()),
            );
            let body = tracking.resolve_all(clause.goals());

            let Some(match_frame) = unify(&self.nodes[id].frame, &goal, &head) else {
                debug!("node {id}: clause {clause_index} does not unify with {goal}");
                continue;
            };

            // Body variables not covered by the head get fresh names of
            // their own, so they cannot collide with the remaining
            // sibling goals.
            let mut rename_frame = match_frame.clone();
            let body =
                Renamer::new(&mut self.variables, &mut rename_frame).rename_all(&body);

            // Child goals: clause body first, then what remains here,
            // eagerly resolved so later goals see earlier bindings.
            let mut child_goals = GoalList::new();
            for term in body.iter().chain(self.nodes[id].goals.iter().skip(1)) {
                child_goals.push(match_frame.resolve(term));
            }

            let child = self.push_node(Some(id), match_frame, child_goals);
            debug!("node {id}: clause {clause_index} matched {goal}, control to node {child}");
            self.current = Some(child);
            return None;
        }

        // Clauses exhausted, or no predicate for the leading goal:
        // backtrack. A root without a parent ends the whole search.
        debug!("node {id}: backtracking");
        self.current = self.nodes[id].parent;
        None
    }

    /// The next untried clause for `id`'s leading goal, in declaration
    /// order.
    fn next_clause(&mut self, id: NodeId) -> Option<(Rule, usize)> {
        let node = &self.nodes[id];
        if node.next_clause >= node.clause_count {
            return None;
        }
        let key = node.predicate.as_deref()?;
        let clause = self.knowledge.predicate(key)?.clauses()[node.next_clause].clone();
        let index = self.nodes[id].next_clause;
        self.nodes[id].next_clause += 1;
        Some((clause, index))
    }

    fn push_node(&mut self, parent: Option<NodeId>, frame: Frame, goals: GoalList) -> NodeId {
        let predicate = goals.first().and_then(|goal| match goal {
            Term::Structure(structure) => Some(structure.full_name()),
            _ => None,
        });
        let clause_count = predicate
            .as_deref()
            .and_then(|key| self.knowledge.predicate(key))
            .map_or(0, |predicate| predicate.clauses().len());

        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            parent,
            frame,
            goals,
            predicate,
            clause_count,
            next_clause: 0,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    /// Re-key a solution frame by the query's original variable names,
    /// fully resolving each binding. An internal variable the proof
    /// left unbound projects as itself.
    pub(crate) fn project(&self, frame: &Frame) -> Frame {
        let mut result = Frame::new();
        for (original, internal) in self.query_frame.iter() {
            result.bind(original.clone(), frame.resolve(internal));
        }
        result
    }

    pub(crate) fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }

    pub(crate) fn root(&self) -> NodeId {
        0
    }

    /// Number of nodes created so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_query, parse_rules};
    use crate::term::Variable;

    fn knowledge(source: &str) -> Knowledge {
        Knowledge::new(parse_rules("test", source).unwrap()).unwrap()
    }

    fn family() -> Knowledge {
        knowledge(
            "parent(tom, bob).
             parent(bob, ann).
             descend(X, Y) :- parent(X, Y).
             descend(X, Y) :- parent(X, Z), descend(Z, Y).",
        )
    }

    fn binding(frame: &Frame, name: &str) -> String {
        frame
            .lookup(&Variable::new(name).unwrap())
            .expect("binding expected")
            .to_string()
    }

    #[test]
    fn test_ground_query_proves_exactly_once() {
        let knowledge = family();
        let query = parse_query("test", "descend(tom, ann)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        let solution = tree.search_one().expect("descend(tom, ann) holds");
        assert!(solution.is_empty(), "no free variables to report");
        assert!(tree.search_one().is_none());
    }

    #[test]
    fn test_solutions_arrive_in_declaration_order() {
        let knowledge = family();
        let query = parse_query("test", "descend(tom, Who)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        let first = tree.search_one().unwrap();
        assert_eq!(binding(&first, "Who"), "bob");
        let second = tree.search_one().unwrap();
        assert_eq!(binding(&second, "Who"), "ann");
        assert!(tree.search_one().is_none());
    }

    #[test]
    fn test_first_clause_wins_between_matching_clauses() {
        let knowledge = knowledge("p(a). p(b).");
        let query = parse_query("test", "p(X)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        assert_eq!(binding(&tree.search_one().unwrap(), "X"), "a");
        assert_eq!(binding(&tree.search_one().unwrap(), "X"), "b");
        assert!(tree.search_one().is_none());
    }

    #[test]
    fn test_undefined_predicate_exhausts_immediately() {
        let knowledge = family();
        let query = parse_query("test", "ancestor(tom, Who)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        assert!(tree.search_one().is_none());
        assert!(tree.is_exhausted());
    }

    #[test]
    fn test_exhaustion_is_idempotent_and_creates_no_nodes() {
        let knowledge = family();
        let query = parse_query("test", "descend(tom, Who)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        while tree.search_one().is_some() {}
        let nodes_after_exhaustion = tree.node_count();

        assert!(tree.search_one().is_none());
        assert!(tree.search_one().is_none());
        assert_eq!(tree.node_count(), nodes_after_exhaustion);
    }

    #[test]
    fn test_ground_fact_query_yields_empty_frame() {
        let knowledge = knowledge("halts(loop_checker).");
        let query = parse_query("test", "halts(loop_checker)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        let solution = tree.search_one().expect("fact is provable");
        assert!(solution.is_empty());
        assert!(tree.search_one().is_none());
    }

    #[test]
    fn test_anonymous_variables_match_without_bindings() {
        let knowledge = family();
        let query = parse_query("test", "parent(_, Who)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        assert_eq!(binding(&tree.search_one().unwrap(), "Who"), "bob");
        assert_eq!(binding(&tree.search_one().unwrap(), "Who"), "ann");
        assert!(tree.search_one().is_none());
    }

    #[test]
    fn test_repeated_query_variable_constrains_both_positions() {
        let knowledge = knowledge("likes(alice, pizza). likes(bob, bob).");
        let query = parse_query("test", "likes(X, X)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        assert_eq!(binding(&tree.search_one().unwrap(), "X"), "bob");
        assert!(tree.search_one().is_none());
    }

    #[test]
    fn test_solution_order_follows_proof_depth() {
        // descend(X, Y) enumerates shallow derivations (direct parents,
        // first clause) before deep ones (the recursive clause).
        let knowledge = family();
        let query = parse_query("test", "descend(X, Y)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        let mut pairs = Vec::new();
        while let Some(frame) = tree.search_one() {
            pairs.push((binding(&frame, "X"), binding(&frame, "Y")));
        }
        assert_eq!(
            pairs,
            vec![
                ("tom".to_string(), "bob".to_string()),
                ("bob".to_string(), "ann".to_string()),
                ("tom".to_string(), "ann".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_structure_goal_backtracks() {
        // The body goal X resolves to the atom `anything`, and a goal
        // that is not a structure has no predicate to resolve against.
        // That is a normal dead end, not an error.
        let knowledge = knowledge("odd(X) :- X. wanted(a).");
        let query = parse_query("test", "odd(anything)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);
        assert!(tree.search_one().is_none());
    }

    #[test]
    fn test_shared_knowledge_backs_independent_trees() {
        let knowledge = family();
        let query = parse_query("test", "descend(tom, Who)").unwrap();
        let mut first = SearchTree::new(&knowledge, &query);
        let mut second = SearchTree::new(&knowledge, &query);

        assert_eq!(binding(&first.search_one().unwrap(), "Who"), "bob");
        // An interleaved second tree is unaffected by the first.
        assert_eq!(binding(&second.search_one().unwrap(), "Who"), "bob");
        assert_eq!(binding(&first.search_one().unwrap(), "Who"), "ann");
        assert_eq!(binding(&second.search_one().unwrap(), "Who"), "ann");
    }

    #[test]
    fn test_unbound_query_variable_projects_as_itself() {
        // foo(_) proves foo(X) without ever binding X's internal
        // variable; the projection reports the internal variable
        // rather than failing.
        let knowledge = knowledge("foo(_).");
        let query = parse_query("test", "foo(X)").unwrap();
        let mut tree = SearchTree::new(&knowledge, &query);

        let solution = tree.search_one().expect("foo(X) is provable");
        let reported = solution
            .lookup(&Variable::new("X").unwrap())
            .expect("X is reported");
        match reported {
            Term::Variable(variable) => assert!(variable.is_generated()),
            other => panic!("expected an unbound internal variable, got {other}"),
        }
    }
}
