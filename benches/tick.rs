use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mole_rush::game::input::InputTrace;
use mole_rush::game::tick::{replay, GameConfig, ReactionGame};

fn bench_config() -> GameConfig {
    GameConfig::new(4, 2000, 10, 40).expect("valid bench config")
}

fn advance_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    group.bench_function("idle_bus", |b| {
        let mut game = ReactionGame::new(bench_config());
        b.iter(|| {
            let output = game.advance(black_box(0));
            black_box(output.score);
        });
    });

    group.bench_function("busy_bus", |b| {
        let mut game = ReactionGame::new(bench_config());
        let mut t = 0u32;
        b.iter(|| {
            // Walk a held press across the channels
            let raw: u8 = if t % 16 < 6 { 1u8 << ((t / 16) % 8) } else { 0 };
            let output = game.advance(black_box(raw));
            black_box(output.score);
            t = t.wrapping_add(1);
        });
    });

    group.finish();
}

fn hash_benchmark(c: &mut Criterion) {
    c.bench_function("state_hash", |b| {
        let mut game = ReactionGame::new(bench_config());
        for t in 0..500 {
            game.advance(if t % 7 < 3 { 0x14 } else { 0 });
        }
        b.iter(|| black_box(game.state_hash()));
    });
}

fn replay_benchmark(c: &mut Criterion) {
    c.bench_function("replay_10k_ticks", |b| {
        let config = bench_config();
        let mut game = ReactionGame::new(config.clone());
        let mut trace = InputTrace::new(game.seed);
        for t in 0..10_000u32 {
            let raw: u8 = if t % 64 < 6 { 1u8 << ((t / 64) % 8) } else { 0 };
            trace.record(game.tick, raw);
            game.advance(raw);
        }
        trace.finalize(game.tick - 1);

        b.iter(|| {
            let (replayed, _) = replay(black_box(&trace), &config);
            black_box(replayed.state_hash())
        });
    });
}

criterion_group!(
    benches,
    advance_benchmark,
    hash_benchmark,
    replay_benchmark
);
criterion_main!(benches);
