use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_match3::core::fill::{fill, FillContext, FillParams};
use tui_match3::core::matcher::all_matches;
use tui_match3::core::{CollectibleTracker, EventBus, GameState, Grid, LevelConfig, PieceFactory, SimpleRng};
use tui_match3::types::{DEFAULT_HEIGHT, DEFAULT_WIDTH, TICK_MS};

fn quiet_level() -> LevelConfig {
    LevelConfig {
        chance_for_collectible: 0.0,
        fill_y_offset: 0,
        ..LevelConfig::default()
    }
}

fn bench_fill(c: &mut Criterion) {
    let params = FillParams::default();
    let mut seed = 0u32;

    c.bench_function("fill_default_board", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut grid = Grid::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
            let mut factory = PieceFactory::new();
            let mut rng = SimpleRng::new(seed);
            let mut collectibles = CollectibleTracker::new(0);
            let mut events = EventBus::new();
            let mut ctx = FillContext {
                grid: &mut grid,
                factory: &mut factory,
                rng: &mut rng,
                collectibles: &mut collectibles,
                events: &mut events,
            };
            black_box(fill(&mut ctx, &params));
        })
    });
}

fn bench_all_matches(c: &mut Criterion) {
    let game = GameState::from_level(quiet_level()).unwrap();

    c.bench_function("all_matches_default_board", |b| {
        b.iter(|| black_box(all_matches(black_box(game.grid()))))
    });
}

fn bench_tick_idle(c: &mut Criterion) {
    let mut game = GameState::from_level(quiet_level()).unwrap();

    c.bench_function("tick_idle_16ms", |b| {
        b.iter(|| {
            game.tick(black_box(TICK_MS));
        })
    });
}

fn bench_swap_resolution(c: &mut Criterion) {
    let cols = DEFAULT_WIDTH - 1;

    c.bench_function("swap_resolution", |b| {
        let mut game = GameState::from_level(quiet_level()).unwrap();
        let mut cell = 0;
        b.iter(|| {
            // Walk the board so accepted and rejected swaps both get measured
            let (x, y) = (cell % cols, cell / cols);
            cell = (cell + 1) % (cols * DEFAULT_HEIGHT);
            if game.outcome().is_some() {
                game.restart();
            }
            game.select_first(x, y);
            game.select_second(x + 1, y);
            game.commit();
            black_box(game.run_until_stable(100_000));
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let game = GameState::from_level(quiet_level()).unwrap();
    let mut snap = game.snapshot();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            game.snapshot_into(&mut snap);
            black_box(&snap);
        })
    });
}

criterion_group!(
    benches,
    bench_fill,
    bench_all_matches,
    bench_tick_idle,
    bench_swap_resolution,
    bench_snapshot
);
criterion_main!(benches);
