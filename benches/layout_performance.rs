//! Layout engine micro-benchmarks
//!
//! Measures traversal and margin collapse throughput on generated element trees.

use boxflow::types::Rect;
use boxflow::{LayoutEngine, PipelineBuilder, StyledElement};
use boxflow_layout::build_tree;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// One row of `count` inline spans.
fn inline_row(count: usize) -> StyledElement {
    let spans = (0..count).map(|i| {
        StyledElement::inline("span", Rect::new(i as f32 * 10.0, 0.0, 10.0, 20.0)).with_text("x")
    });
    StyledElement::block("div", Rect::new(0.0, 0.0, count as f32 * 10.0, 20.0)).with_children(spans)
}

/// `sections` stacked blocks, each with a left float beside two lines of text.
fn float_page(sections: usize) -> StyledElement {
    let children = (0..sections).map(|i| {
        let y = i as f32 * 110.0;
        let figure = StyledElement::block("img", Rect::new(0.0, y, 80.0, 80.0)).float_left();
        StyledElement::block("section", Rect::new(0.0, y, 600.0, 100.0))
            .margin([10.0, 0.0, 10.0, 0.0])
            .with_child(StyledElement::block("h2", Rect::new(0.0, y, 600.0, 20.0)))
            .with_child(figure)
            .with_child(StyledElement::text("caption", Rect::new(90.0, y + 20.0, 510.0, 40.0)).lines(2))
    });
    StyledElement::block("body", Rect::new(0.0, 0.0, 600.0, sections as f32 * 110.0))
        .with_children(children)
}

/// A chain of `depth` nested blocks, each contributing a top margin.
fn nested_blocks(depth: usize) -> StyledElement {
    let mut element = StyledElement::block("p", Rect::new(0.0, 0.0, 400.0, 20.0))
        .margin([8.0, 0.0, 8.0, 0.0]);
    for _ in 0..depth {
        element = StyledElement::block("div", Rect::new(0.0, 0.0, 400.0, 20.0))
            .margin([4.0, 0.0, 4.0, 0.0])
            .with_child(element);
    }
    element
}

fn benchmark_inline_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_inline_rows");
    for count in [10, 100, 1000] {
        let input = inline_row(count);
        group.bench_with_input(BenchmarkId::new("spans", count), &input, |b, input| {
            let mut engine = LayoutEngine::default();
            b.iter(|| {
                let mut tree = build_tree(input);
                black_box(engine.resolve(&mut tree).expect("Failed to resolve layout"))
            });
        });
    }
    group.finish();
}

fn benchmark_float_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_float_pages");
    for sections in [10, 100, 500] {
        let input = float_page(sections);
        group.bench_with_input(BenchmarkId::new("sections", sections), &input, |b, input| {
            let mut engine = LayoutEngine::default();
            b.iter(|| {
                let mut tree = build_tree(input);
                black_box(engine.resolve(&mut tree).expect("Failed to resolve layout"))
            });
        });
    }
    group.finish();
}

fn benchmark_nested_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_nested_blocks");
    for depth in [8, 64, 256] {
        let input = nested_blocks(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &input, |b, input| {
            let mut pipeline = PipelineBuilder::new().build().expect("Failed to build pipeline");
            b.iter(|| black_box(pipeline.run(input).expect("Failed to run pipeline")));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_inline_rows,
    benchmark_float_pages,
    benchmark_nested_blocks
);
criterion_main!(benches);
