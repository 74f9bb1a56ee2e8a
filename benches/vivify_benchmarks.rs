use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use autoviv::{Tree, Value, create};

const DEPTH: usize = 64;
const WIDTH: usize = 10_000;

fn empty() -> Tree {
    create(Value::empty_array()).unwrap().into_tree().unwrap()
}

fn wide_tree(n: usize) -> Tree {
    let mut tree = empty();
    for i in 0..n {
        tree.get_mut(i).unwrap().set(0, "leaf").unwrap();
    }
    tree
}

// ─── Writes ─────────────────────────────────────────────────────────────────

fn bench_deep_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_write");

    group.bench_function(BenchmarkId::new("zeros", DEPTH), |b| {
        b.iter(|| {
            let mut tree = empty();
            let mut cursor = tree.cursor_mut();
            for _ in 0..DEPTH {
                cursor = cursor.get(0).unwrap();
            }
            cursor.set(0, "bottom").unwrap();
            tree
        });
    });

    group.bench_function(BenchmarkId::new("padded", DEPTH), |b| {
        b.iter(|| {
            let mut tree = empty();
            let mut cursor = tree.cursor_mut();
            for _ in 0..DEPTH {
                cursor = cursor.get(7).unwrap();
            }
            cursor.set(7, "bottom").unwrap();
            tree
        });
    });

    group.finish();
}

fn bench_sparse_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_write");

    group.bench_function(BenchmarkId::new("every_third", WIDTH), |b| {
        b.iter(|| {
            let mut tree = empty();
            for i in (0..WIDTH).step_by(3) {
                tree.set(i, "x").unwrap();
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("overwrite_subtrees", WIDTH), |b| {
        let tree = wide_tree(WIDTH);
        b.iter(|| {
            let mut tree = tree.clone();
            for i in 0..WIDTH {
                tree.set(i, ()).unwrap();
            }
            tree
        });
    });

    group.finish();
}

// ─── Reads and rendering ────────────────────────────────────────────────────

fn bench_placeholder_read(c: &mut Criterion) {
    let tree = wide_tree(WIDTH);
    c.bench_function("placeholder_read", |b| {
        b.iter(|| {
            let mut cursor = tree.get(black_box(WIDTH)).unwrap();
            for _ in 0..DEPTH {
                cursor = cursor.get(0).unwrap();
            }
            cursor.is_placeholder()
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let tree = wide_tree(WIDTH);
    c.bench_function("render", |b| b.iter(|| black_box(&tree).to_string()));
    c.bench_function("to_value", |b| b.iter(|| black_box(&tree).to_value()));
}

criterion_group!(benches, bench_deep_write, bench_sparse_write, bench_placeholder_read, bench_render);
criterion_main!(benches);
