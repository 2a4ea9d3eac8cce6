//! Order book throughput benchmarks
//!
//! Measures admission cost (new vs existing price levels) and the
//! top-of-book queries the matching step depends on.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use matching_core::book::OrderBook;
use types::ids::ClientId;
use types::numeric::{Price, Quantity};
use types::order::{OrderIntent, Side};

fn populated_book(orders: u64, levels: u64) -> OrderBook {
    let mut book = OrderBook::new();
    for i in 0..orders {
        let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };
        // bids below 1000, asks above, spread across `levels` prices
        let price = match side {
            Side::Bid => 1000 - (i % levels),
            Side::Ask => 1001 + (i % levels),
        };
        let intent = OrderIntent::add(
            side,
            Price::from_u64(price),
            Quantity::from_u64(1 + i % 10),
            ClientId::new("bench"),
        );
        book.submit(intent).expect("admission");
    }
    book
}

fn bench_admission(c: &mut Criterion) {
    c.bench_function("admit_10k_orders_100_levels", |b| {
        b.iter(|| populated_book(black_box(10_000), 100))
    });

    c.bench_function("admit_existing_level", |b| {
        let mut book = populated_book(10_000, 100);
        b.iter(|| {
            let intent = OrderIntent::add(
                Side::Bid,
                Price::from_u64(995),
                Quantity::from_u64(1),
                ClientId::new("bench"),
            );
            let id = book.submit(black_box(intent)).expect("admission");
            // keep the book size stable
            let cancel = OrderIntent::cancel(id, Side::Bid, ClientId::new("bench"));
            book.submit(cancel).expect("cancel");
        })
    });
}

fn bench_top_of_book(c: &mut Criterion) {
    let book = populated_book(10_000, 100);

    c.bench_function("best_bid", |b| b.iter(|| black_box(book.best_bid())));
    c.bench_function("mid_price", |b| b.iter(|| black_box(book.mid_price())));
    c.bench_function("volume_at_limit", |b| {
        b.iter(|| black_box(book.volume_at(Side::Ask, Price::from_u64(1050))))
    });
}

criterion_group!(benches, bench_admission, bench_top_of_book);
criterion_main!(benches);
