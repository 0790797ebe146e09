//! Criterion benchmarks for lineage tree construction and layout
//!
//! These benchmarks measure tree building at various lineage shapes to
//! ensure acceptable scaling characteristics.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dazzign_core::{ImageNode, NodeId};
use dazzign_lineage::{build_tree, TreeLayout};

/// A single edit chain: 0 -> 1 -> 2 -> ... -> n
fn chain_records(size: usize) -> Vec<ImageNode> {
    let mut records = vec![ImageNode::root(0, "origin")];
    for i in 1..size as i64 {
        records.push(ImageNode::child_of(i, i - 1, format!("v{i}")));
    }
    records
}

/// A wide lineage: every node branches `fanout` times, `depth` levels deep
fn fanout_records(fanout: usize, depth: usize) -> Vec<ImageNode> {
    let mut records = vec![ImageNode::root(0, "origin")];
    let mut next_id = 1i64;
    let mut frontier = vec![0i64];
    for _ in 0..depth {
        let mut next_frontier = Vec::new();
        for parent in frontier {
            for _ in 0..fanout {
                records.push(ImageNode::child_of(next_id, parent, "edit"));
                next_frontier.push(next_id);
                next_id += 1;
            }
        }
        frontier = next_frontier;
    }
    records
}

fn bench_build_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree_chain");
    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let records = chain_records(size);
            b.iter(|| build_tree(black_box(records.clone()), NodeId(0)).unwrap());
        });
    }
    group.finish();
}

fn bench_build_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree_fanout");
    for (fanout, depth) in [(3usize, 6usize), (10, 3)] {
        let records = fanout_records(fanout, depth);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("fanout", format!("{fanout}x{depth}")),
            &records,
            |b, records| b.iter(|| build_tree(black_box(records.clone()), NodeId(0)).unwrap()),
        );
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let tree = build_tree(fanout_records(3, 6), NodeId(0)).unwrap();
    c.bench_function("layout_fanout_3x6", |b| {
        b.iter(|| TreeLayout::build(black_box(&tree), Some(NodeId(5))));
    });
}

criterion_group!(benches, bench_build_chain, bench_build_fanout, bench_layout);
criterion_main!(benches);
