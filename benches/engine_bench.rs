#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hornlog::{parse_query, parse_rules, Frame, Knowledge, SearchTree};

/// A linear chain of edges plus transitive closure rules.
fn chain_source(nodes: usize) -> String {
    let mut source = String::new();
    for i in 0..nodes {
        source.push_str(&format!("edge(n{i}, n{}).\n", i + 1));
    }
    source.push_str("path(X, Y) :- edge(X, Y).\n");
    source.push_str("path(X, Z) :- edge(X, Y), path(Y, Z).\n");
    source
}

fn chain_knowledge(nodes: usize) -> Knowledge {
    Knowledge::new(parse_rules("bench", &chain_source(nodes)).unwrap()).unwrap()
}

/// Benchmark for parsing and grouping a clause list
fn bench_build_knowledge(c: &mut Criterion) {
    let source = chain_source(500);

    c.bench_function("build_knowledge", |b| {
        b.iter(|| {
            let rules = parse_rules("bench", black_box(&source)).unwrap();
            black_box(Knowledge::new(rules).unwrap())
        });
    });
}

/// Benchmark for finding the first solution of a recursive query
fn bench_first_solution(c: &mut Criterion) {
    let knowledge = chain_knowledge(100);
    let query = parse_query("bench", "path(n0, Where)").unwrap();

    c.bench_function("first_solution", |b| {
        b.iter(|| {
            let mut tree = SearchTree::new(&knowledge, &query);
            black_box(tree.search_one())
        });
    });
}

/// Benchmark for enumerating every solution of a recursive query
fn bench_enumerate_all_solutions(c: &mut Criterion) {
    let knowledge = chain_knowledge(50);
    let query = parse_query("bench", "path(n0, Where)").unwrap();

    c.bench_function("enumerate_all_solutions", |b| {
        b.iter(|| {
            let mut tree = SearchTree::new(&knowledge, &query);
            let mut solutions: Vec<Frame> = Vec::new();
            while let Some(frame) = tree.search_one() {
                solutions.push(frame);
            }
            black_box(solutions)
        });
    });
}

criterion_group!(
    benches,
    bench_build_knowledge,
    bench_first_solution,
    bench_enumerate_all_solutions
);
criterion_main!(benches);
