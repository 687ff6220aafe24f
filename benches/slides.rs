//! Benchmarks for slide segmentation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mdpager::document::parse_slides;

fn deck(slides: usize, lines_per_slide: usize) -> String {
    let mut body = String::from("Preamble that is not part of any slide\n");
    for n in 1..=slides {
        body.push_str(&format!("# {n} Slide\n"));
        for line in 0..lines_per_slide {
            body.push_str(&format!("Line {line} of slide {n} with some *emphasis*\n"));
        }
    }
    body
}

fn bench_parse_small_deck(c: &mut Criterion) {
    let body = deck(5, 10);
    c.bench_function("parse_slides_small", |b| {
        b.iter(|| parse_slides(black_box(&body), true))
    });
}

fn bench_parse_large_deck(c: &mut Criterion) {
    let body = deck(200, 50);
    c.bench_function("parse_slides_large", |b| {
        b.iter(|| parse_slides(black_box(&body), true))
    });
}

criterion_group!(benches, bench_parse_small_deck, bench_parse_large_deck);
criterion_main!(benches);
