//! Engine performance benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench engine`.

use ashare_front::order_gen::{Generator, GeneratorConfig};
use ashare_front::{MatchingEngine, Order};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};

/// Match each order and rest whatever does not fill (pure-mode shape,
/// without the coordinator).
fn replay(engine: &mut MatchingEngine, orders: &[Order]) {
    for order in orders {
        match engine.match_order(order, None) {
            None => {
                engine.add_order(order);
            }
            Some(result) if result.remaining_qty > 0 => {
                let mut residual = order.clone();
                residual.qty = result.remaining_qty;
                engine.add_order(&residual);
            }
            Some(_) => {}
        }
    }
}

fn bench_match_throughput(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("match_or_rest_1000", |b| {
        b.iter_batched(
            || {
                Generator::new(GeneratorConfig {
                    seed: 42,
                    num_orders: N,
                    ..Default::default()
                })
                .all_orders()
            },
            |orders| {
                let mut engine = MatchingEngine::new();
                replay(&mut engine, &orders);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cancel_order(c: &mut Criterion) {
    const RESTING: usize = 500;
    const CANCELS_PER_ITER: usize = 100;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(CANCELS_PER_ITER as u64));
    group.bench_function("cancel_order_100_after_500_resting", |b| {
        b.iter_batched(
            || {
                let orders = Generator::new(GeneratorConfig {
                    seed: 123,
                    num_orders: RESTING,
                    ..Default::default()
                })
                .all_orders();
                let mut engine = MatchingEngine::new();
                for order in &orders {
                    engine.add_order(order);
                }
                let cancel_ids: Vec<String> = orders[..CANCELS_PER_ITER]
                    .iter()
                    .map(|o| o.cl_order_id.clone())
                    .collect();
                (engine, cancel_ids)
            },
            |(mut engine, cancel_ids)| {
                for id in cancel_ids {
                    let _ = engine.cancel_order(&id);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_match_throughput, bench_cancel_order);
criterion_main!(benches);
