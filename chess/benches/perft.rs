use criterion::{Criterion, black_box, criterion_group, criterion_main};

use chess::board::{Board, START_FEN, TRICKY_FEN, init_tables};
use chess::utils::perft;

fn perft_startpos(c: &mut Criterion) {
    init_tables();

    let mut board = Board::from_fen(START_FEN).unwrap();

    c.bench_function("perft startpos depth 4", |b| {
        b.iter(|| {
            let nodes = perft(&mut board, black_box(4));
            assert_eq!(nodes, 197281);
        })
    });
}

fn perft_kiwipete(c: &mut Criterion) {
    init_tables();

    let mut board = Board::from_fen(TRICKY_FEN).unwrap();

    c.bench_function("perft kiwipete depth 3", |b| {
        b.iter(|| {
            let nodes = perft(&mut board, black_box(3));
            assert_eq!(nodes, 97862);
        })
    });
}

criterion_group!(benches, perft_startpos, perft_kiwipete);
criterion_main!(benches);
