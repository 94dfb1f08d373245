use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use spectator_core::{reduce, Cell, ColorRegistry, EntityId, PaletteConfig, Snapshot};

fn board(size: usize, owners: usize) -> Snapshot {
    let columns = (0..size)
        .map(|x| {
            (0..size)
                .map(|y| match (x * size + y) % 7 {
                    0 => Cell::Mountain,
                    1 => Cell::Empty,
                    2 => Cell::NeutralTown { units: 40 },
                    3 => Cell::PlayerCapital {
                        units: (x + y) as u32,
                        owner: EntityId::from(format!("p{}", (x + y) % owners)),
                    },
                    4 => Cell::PlayerTown {
                        units: y as u32,
                        owner: EntityId::from(format!("p{}", x % owners)),
                    },
                    _ => Cell::PlayerEmpty {
                        units: 1,
                        owner: EntityId::from(format!("p{}", y % owners)),
                    },
                })
                .collect()
        })
        .collect();
    Snapshot::new(columns)
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    for size in [8usize, 16, 32, 48, 64] {
        let snapshot = board(size, 8);
        group.bench_with_input(BenchmarkId::new("grid", size), &snapshot, |b, snapshot| {
            b.iter_batched(
                || ColorRegistry::with_seed(PaletteConfig::default(), 0),
                |mut colors| reduce(snapshot, &mut colors),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(reduce_benches, bench_reduce);
criterion_main!(reduce_benches);
