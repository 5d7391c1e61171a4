#![allow(missing_docs)]

use divan::black_box;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const WIKIPEDIA: &str = include_str!("wikipedia.txt");

#[divan::bench]
fn safehtml() -> String {
    safehtml::clean(black_box(WIKIPEDIA)).unwrap()
}

#[divan::bench]
fn ammonia() -> String {
    ammonia::clean(black_box(WIKIPEDIA))
}

fn main() {
    divan::main();
}
