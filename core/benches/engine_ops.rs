use chromatch_core::*;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn started_grid(mode: GridMode, rule: WinRule) -> GridEngine<SeededColorSource, MemoryStore> {
    let mut engine = GridEngine::new(
        GridConfig::new(mode, rule),
        SeededColorSource::new(42),
        MemoryStore::new(),
    );
    engine.restart();
    engine
}

fn bench_apply_move(c: &mut Criterion) {
    for mode in GridMode::ALL {
        let size = mode.grid_size();
        c.bench_function(&format!("grid/apply_move/{}", mode.key()), |b| {
            b.iter_batched(
                || started_grid(mode, WinRule::Uniform),
                |mut engine| {
                    for row in 0..size {
                        for col in 0..size {
                            let _ = black_box(engine.apply_move((row, col)));
                        }
                    }
                    engine
                },
                BatchSize::SmallInput,
            )
        });
    }
}

fn bench_hint(c: &mut Criterion) {
    c.bench_function("grid/isolated_hint/hard", |b| {
        let mut engine = started_grid(GridMode::Hard, WinRule::IsolatedCount);
        for coords in [(0, 0), (2, 2), (4, 1), (1, 3)] {
            let _ = engine.apply_move(coords);
        }
        b.iter(|| black_box(rules::isolated_hint(engine.board(), CellColor::Red)))
    });
}

fn bench_generate_tiles(c: &mut Criterion) {
    for mode in [MemoryMode::Easy, MemoryMode::Hard] {
        c.bench_function(&format!("memory/generate_tiles/{}", mode.key()), |b| {
            let mut source = SeededColorSource::new(7);
            b.iter(|| black_box(generate_tiles(&mut source, mode.config(), TileId(0))))
        });
    }
}

fn bench_memory_round(c: &mut Criterion) {
    c.bench_function("memory/reveal_and_tick", |b| {
        b.iter_batched(
            || MemoryEngine::new(MemoryMode::Hard, SeededColorSource::new(3), MemoryStore::new()),
            |mut engine| {
                engine.start_game(MemoryMode::Hard);
                for _ in 0..TICKS_PER_SECOND * 3 {
                    black_box(engine.on_tick());
                }
                engine
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_apply_move,
    bench_hint,
    bench_generate_tiles,
    bench_memory_round
);
criterion_main!(benches);
