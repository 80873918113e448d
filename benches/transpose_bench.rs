use cachetrans::{Strategy, transpose_with};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    for (rows, cols) in [(32, 32), (64, 64), (67, 61), (512, 512)] {
        let a: Vec<i32> = (0..(rows * cols) as i32).collect();
        let mut b = vec![0; rows * cols];

        let mut strategies = vec![
            Strategy::RowWise,
            Strategy::Blocked(8),
            Strategy::select(cachetrans::Shape::new(rows, cols)),
        ];
        if rows == cols && rows % 8 == 0 {
            strategies.push(Strategy::Specialized64);
        }
        strategies.dedup();

        for strategy in strategies {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), format!("{}x{}", rows, cols)),
                &strategy,
                |bench, &strategy| {
                    bench.iter(|| transpose_with(strategy, black_box(&a), &mut b, rows, cols))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
