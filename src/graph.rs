//! DOT export of a search tree.
//!
//! A read-only projection of the node tree for rendering with an
//! external diagram tool: nodes show goal-list snapshots (or the final
//! bindings at a solution), edges show the variables newly bound on the
//! way down, filtered to those the parent's goals actually mention.

use std::fmt::Write as _;

use crate::frame::Frame;
use crate::search::{NodeId, SearchTree};
use crate::term::{Term, Variable};

/// Render `tree` as a DOT digraph. Solution nodes are green, dead
/// leaves red. Works on finished and suspended searches alike.
#[must_use]
pub fn to_dot(tree: &SearchTree<'_>) -> String {
    let mut out = String::from("digraph {\n");
    write_node(tree, tree.root(), &mut out);
    out.push('}');
    out
}

fn write_node(tree: &SearchTree<'_>, id: NodeId, out: &mut String) {
    let node = &tree.nodes()[id];

    let label = if node.goals.is_empty() {
        let result = tree.project(&node.frame);
        if result.is_empty() {
            "yes".to_string()
        } else {
            bindings_label(&result)
        }
    } else {
        node.goals
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",\\n")
    };

    let color = if node.goals.is_empty() {
        " color=green"
    } else if node.children.is_empty() {
        " color=red"
    } else {
        ""
    };

    let _ = writeln!(out, "\tN{id} [label=\"{}\"{color}];", escape(&label));

    for &child in &node.children {
        write_node(tree, child, out);
        let delta = frame_delta(tree, id, child);
        let _ = writeln!(out, "\tN{id} -> N{child} [label=\"{}\"];", escape(&delta));
    }
}

fn bindings_label(frame: &Frame) -> String {
    let mut label = String::new();
    for (variable, term) in frame.iter() {
        let _ = write!(label, "{variable} = {term}\\n");
    }
    label
}

/// The bindings the child introduced over its parent, resolved in the
/// child's frame and filtered to variables the parent's goals mention.
fn frame_delta(tree: &SearchTree<'_>, parent: NodeId, child: NodeId) -> String {
    let parent_node = &tree.nodes()[parent];
    let child_node = &tree.nodes()[child];

    let mut label = String::new();
    for (variable, term) in child_node.frame.iter() {
        if parent_node.frame.lookup(variable) == Some(term) {
            continue;
        }
        if !parent_node
            .goals
            .iter()
            .any(|goal| occurs_in(variable, goal))
        {
            continue;
        }
        let resolved = child_node.frame.resolve(term);
        let _ = write!(label, "{variable} = {resolved}\\n");
    }
    label
}

fn occurs_in(variable: &Variable, term: &Term) -> bool {
    match term {
        Term::Variable(v) => v == variable,
        Term::Structure(structure) => structure
            .arguments()
            .iter()
            .any(|argument| occurs_in(variable, argument)),
        Term::Atom(_) | Term::Anonymous => false,
    }
}

fn escape(label: &str) -> String {
    label.replace('"', "\\\"")
}
