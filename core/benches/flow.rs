use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use suiro_core::{LevelData, flow};

fn dense_grid(rows: u8, cols: u8) -> suiro_core::Grid {
    let cells = vec![1u8; rows as usize * cols as usize];
    LevelData::new(rows, cols, cells)
        .unwrap()
        .build_grid()
        .unwrap()
}

fn pipeline_grid(cols: u8) -> suiro_core::Grid {
    let mut cells = vec![3u8; cols as usize];
    cells[0] = 1;
    LevelData::new(1, cols, cells).unwrap().build_grid().unwrap()
}

fn bench_recompute(c: &mut Criterion) {
    let dense = dense_grid(64, 64);
    c.bench_function("recompute dense 64x64", |b| {
        b.iter_batched(
            || dense.clone(),
            |mut grid| flow::recompute(black_box(&mut grid)),
            BatchSize::SmallInput,
        )
    });

    let pipeline = pipeline_grid(255);
    c.bench_function("recompute pipeline 1x255", |b| {
        b.iter_batched(
            || pipeline.clone(),
            |mut grid| flow::recompute(black_box(&mut grid)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_recompute);
criterion_main!(benches);
