use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rulecase::solver::Solver;
use rulecase::{
    Function, GeneratorOptions, Node, NormItem, Parameters, RuleDocument, RuleSet,
    ScenarioBuilder, VariableDef,
};

/// `Vx1 > P1 AND (C1 = 1 OR ... OR C1 = width)` repeated `groups` times
fn or_heavy_block(groups: usize, width: usize) -> Node {
    let mut block = Node::var("Vx1").gt(Node::var("P1"));
    for g in 0..groups {
        let code = format!("C{}", g + 1);
        let mut group = Node::var(code.clone()).equals(Node::constant(1.0));
        for k in 2..=width {
            group = group.or(Node::var(code.clone()).equals(Node::constant(k as f64)));
        }
        block = block.and(group);
    }
    block
}

fn declaration() -> RuleSet {
    let variables = vec![
        VariableDef::new("BASE", Node::var("BGLO").sub(Node::var("C106"))),
        VariableDef::new(
            "FLAG",
            Node::conditional(
                Node::var("BASE").gt(Node::var("P1")),
                Node::constant(1.0),
                Node::constant(0.0),
            ),
        ),
        VariableDef::new(
            "NET",
            Node::call(Function::Pos, vec![Node::var("BASE").sub(Node::var("C107"))]),
        ),
        VariableDef::new(
            "TOP",
            Node::call(Function::Max, vec![Node::var("NET"), Node::var("C108")]),
        ),
    ];
    let norm = vec![
        NormItem::Condition(Node::var("C50").le(Node::call(
            Function::Max,
            vec![Node::var("TOP"), Node::var("C51")],
        ))),
        NormItem::Calculation(VariableDef::new(
            "REST",
            Node::call(Function::Pos, vec![Node::var("TOP").sub(Node::var("C50"))]),
        )),
    ];
    let mut macros = BTreeMap::new();
    macros.insert(
        "BGLO".to_string(),
        Node::sum((104..112).map(|c| Node::var(format!("C{}", c))).collect()),
    );
    let document = RuleDocument {
        entry_condition: or_heavy_block(2, 3),
        variables,
        norm_observation: norm,
    };
    RuleSet::new(document, macros, Parameters::from_pairs([("P1", 10.0)])).unwrap()
}

fn satisfying_benchmark(c: &mut Criterion) {
    let rules = RuleSet::new(
        RuleDocument::default(),
        BTreeMap::new(),
        Parameters::from_pairs([("P1", 10.0)]),
    )
    .unwrap();
    let options = GeneratorOptions::default();

    let mut group = c.benchmark_group("satisfying scenarios");
    for groups in [1usize, 2, 3] {
        let block = or_heavy_block(groups, 4);
        group.bench_with_input(BenchmarkId::from_parameter(groups), &block, |b, block| {
            b.iter(|| {
                let mut solver = Solver::new(&rules, &options);
                solver.satisfying_scenarios(black_box(block)).unwrap()
            })
        });
    }
    group.finish();
}

fn suite_benchmark(c: &mut Criterion) {
    let rules = declaration();
    let builder = ScenarioBuilder::with_defaults(&rules);

    c.bench_function("build full suite", |b| {
        b.iter(|| black_box(&builder).build().unwrap())
    });
}

criterion_group!(benches, satisfying_benchmark, suite_benchmark);
criterion_main!(benches);
