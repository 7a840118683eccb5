//! Criterion benchmarks for the receive window's hot paths.
//!
//! Run: cargo bench --bench bench_window

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use rxwindow::{SlotState, Window, WindowConfig};

const CAPACITY: u32 = 8192;
const PAYLOAD: &[u8] = &[0xAB; 128];

fn window(capacity: u32) -> Window {
    let config = WindowConfig::new(1500).unwrap().with_capacity(capacity).unwrap();
    Window::new(config, |payload| {
        black_box(payload);
    })
    .unwrap()
}

fn bench_in_order_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push: in-order");
    group.throughput(Throughput::Elements(1));

    group.bench_function(BenchmarkId::new("push", "contiguous"), |b| {
        b.iter_batched(
            || window(CAPACITY),
            |mut win| {
                for seq in 0..CAPACITY {
                    win.push(black_box(PAYLOAD), seq, 0).unwrap();
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_gap_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("push: gap-then-fill");

    group.bench_function("alternating gaps", |b| {
        b.iter_batched(
            || window(CAPACITY),
            |mut win| {
                // Push every other sequence first (leaving a gap behind
                // each), then go back and fill the gaps.
                for seq in (0..CAPACITY).step_by(2) {
                    win.push(black_box(PAYLOAD), seq, 0).unwrap();
                }
                for seq in (1..CAPACITY).step_by(2) {
                    win.push(black_box(PAYLOAD), seq, 0).unwrap();
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_state_foreach(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_foreach: backoff drain");

    group.bench_function("drain and requeue", |b| {
        b.iter_batched(
            || {
                let mut win = window(CAPACITY);
                // Leave a trailing gap of placeholders by pushing only the
                // lead of a wide extension.
                win.push(PAYLOAD, CAPACITY - 1, 0).unwrap();
                win
            },
            |mut win| {
                win.state_foreach(SlotState::BackOff, |_payload, seq, state, _age, _retry| {
                    black_box(seq);
                    *state = SlotState::WaitNcf;
                    false
                });
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_in_order_push, bench_gap_fill, bench_state_foreach);
criterion_main!(benches);
