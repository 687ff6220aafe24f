//! Benchmarks for the render pipeline.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mdpager::render::{RenderRequest, StyleConfig, TermRenderer, render_content};

const MARKDOWN: &str = "# Title\n\nSome *emphasis* and **strong** text with `code`.\n\n\
- one\n- two\n  - nested\n\n> quoted\n\n```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n\
| a | b |\n|---|---|\n| 1 | 2 |\n";

const CODE: &str = "use std::io;\n\nfn main() -> io::Result<()> {\n    let x = 1;\n    println!(\"{x}\");\n    Ok(())\n}\n";

fn request(text: &str, note: &str, line_numbers: bool) -> RenderRequest {
    RenderRequest {
        seq: 1,
        text: text.repeat(20),
        note: note.to_string(),
        width: 100,
        style: StyleConfig {
            show_line_numbers: line_numbers,
            ..StyleConfig::default()
        },
    }
}

fn bench_markdown(c: &mut Criterion) {
    let req = request(MARKDOWN, "doc.md", false);
    c.bench_function("render_markdown", |b| {
        b.iter(|| render_content(black_box(&req), &TermRenderer).unwrap())
    });
}

fn bench_markdown_numbered(c: &mut Criterion) {
    let req = request(MARKDOWN, "doc.md", true);
    c.bench_function("render_markdown_numbered", |b| {
        b.iter(|| render_content(black_box(&req), &TermRenderer).unwrap())
    });
}

fn bench_code(c: &mut Criterion) {
    let req = request(CODE, "main.rs", false);
    c.bench_function("render_code", |b| {
        b.iter(|| render_content(black_box(&req), &TermRenderer).unwrap())
    });
}

criterion_group!(benches, bench_markdown, bench_markdown_numbered, bench_code);
criterion_main!(benches);
