//! Todo store benchmarks
//!
//! Every mutation rebuilds the whole collection, so cost grows linearly with
//! list size. These benchmarks show how steep that line is:
//! - Submit on lists of growing size
//! - Edit and toggle of the last todo (worst case for the lookup)
//! - Visible-list projection
//!
//! Run with: `cargo bench -p todo`

#![allow(missing_docs)] // Benchmarks don't need extensive docs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reducer_runtime::StoreConfig;
use reducer_testing::test_clock;
use std::sync::Arc;
use todo::{new_store, TodoAction, TodoEnvironment, TodoState, TodoStore};

const SIZES: [usize; 3] = [10, 100, 1_000];

fn store_with(size: usize) -> TodoStore {
    let mut store = new_store(
        TodoEnvironment::new(Arc::new(test_clock())),
        StoreConfig::default(),
    );
    for n in 0..size {
        let _ = store.send(TodoAction::SetInputText {
            text: format!("todo {n}"),
        });
        let _ = store.send(TodoAction::Submit);
    }
    // Hide every other todo so the projection has work to do
    let ids: Vec<_> = store.state(|s| s.todos().iter().map(|t| t.id).collect());
    for id in ids.into_iter().step_by(2) {
        let _ = store.send(TodoAction::ToggleRemoved { id, current: true });
    }
    store
}

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");
    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut store = store_with(size);
            b.iter(|| {
                let _ = store.send(black_box(TodoAction::Submit));
            });
        });
    }
    group.finish();
}

fn bench_edit_and_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_and_toggle");
    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut store = store_with(size);
            let oldest = store.state(|s| s.todos()[s.count() - 1].id);
            b.iter(|| {
                let _ = store.send(TodoAction::EditTodo {
                    id: oldest,
                    value: black_box(String::from("edited")),
                });
                let _ = store.send(TodoAction::ToggleDone {
                    id: oldest,
                    current: black_box(false),
                });
            });
        });
    }
    group.finish();
}

fn bench_visible_todos(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_todos");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let store = store_with(size);
            b.iter(|| black_box(store.state(TodoState::visible_todos)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_submit, bench_edit_and_toggle, bench_visible_todos);
criterion_main!(benches);
