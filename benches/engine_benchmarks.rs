//! Benchmarks for chess engine performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_opponent::config::EngineConfig;
use chess_opponent::position::Position;
use chess_opponent::search::Searcher;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn position(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let start = Position::initial();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| start.perft(black_box(depth)))
        });
    }

    let kiwipete = position(KIWIPETE);
    for depth in 1..=2 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, pos) in [
        ("startpos", Position::initial()),
        ("middlegame", position(MIDDLEGAME)),
        ("kiwipete", position(KIWIPETE)),
    ] {
        group.bench_function(name, |b| b.iter(|| black_box(pos.legal_moves())));
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let config = EngineConfig::default().with_time_cap(None);
    for budget in [2_000u64, 10_000, 50_000] {
        group.bench_with_input(BenchmarkId::new("startpos", budget), &budget, |b, &budget| {
            b.iter(|| {
                let mut searcher = Searcher::with_config(config.clone());
                searcher.search(&Position::initial(), budget)
            })
        });
    }

    let tactical =
        position("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4");
    group.bench_function("tactical", |b| {
        b.iter(|| {
            let mut searcher = Searcher::with_config(config.clone());
            searcher.search(&tactical, 10_000)
        })
    });

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", Position::initial()),
        ("middlegame", position(MIDDLEGAME)),
        ("endgame", position("8/5k2/8/8/8/8/5K2/4R3 w - - 0 1")),
    ];

    for (name, pos) in positions {
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(pos.evaluate()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_perft,
    bench_movegen,
    bench_search,
    bench_eval
);
criterion_main!(benches);
