//! Aggregation throughput: serial vs parallel over a contiguity grid

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use urbanmorph_classify::ContextPlan;
use urbanmorph_context::AggregationEngine;
use urbanmorph_core::execution::{parallel, serial};
use urbanmorph_core::{AttributeTable, Characteristic};
use urbanmorph_graph::ContiguityGraph;

fn grid_fixture(side: usize) -> (AttributeTable<u64>, ContiguityGraph<u64>) {
    let mut rng = StdRng::seed_from_u64(99);
    let mut builder = AttributeTable::builder(vec![
        Characteristic::new("area"),
        Characteristic::new("compactness"),
    ]);
    for id in 0..(side * side) as u64 {
        let area = rng.gen_range(0.0f64..1.0).powi(4) * 1e4;
        let compactness = rng.gen_range(0.0f64..1.0);
        builder.push_row(id, &[area, compactness]).unwrap();
    }

    let at = |r: usize, c: usize| (r * side + c) as u64;
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                edges.push((at(r, c), at(r, c + 1)));
            }
            if r + 1 < side {
                edges.push((at(r, c), at(r + 1, c)));
            }
        }
    }
    let graph = ContiguityGraph::from_edges(0..(side * side) as u64, edges).unwrap();
    (builder.build(), graph)
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("contextual_aggregation");

    for side in [10usize, 20, 30] {
        let (table, graph) = grid_fixture(side);
        // third-order neighborhoods, as in a typical morphometric run
        let graph = graph.higher_order(3).unwrap();
        let plan = ContextPlan::fit(&table).unwrap();
        let engine = AggregationEngine::new(&table, &graph, &plan).unwrap();

        let units = side * side;
        group.bench_with_input(BenchmarkId::new("serial", units), &engine, |b, engine| {
            let pool = serial();
            b.iter(|| engine.run(&pool).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parallel", units), &engine, |b, engine| {
            let pool = parallel();
            b.iter(|| engine.run(&pool).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
