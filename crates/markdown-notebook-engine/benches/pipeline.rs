use criterion::{Criterion, criterion_group, criterion_main};
use markdown_notebook_engine::{
    LineSource, MemorySnippetSource, PipelineOptions, convert, parsing::paragraphs,
};
use pulldown_cmark::Parser;
mod common;

fn bench_pulldown_cmark_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = Parser::new(std::hint::black_box(&content));
            let events: Vec<_> = parser.collect();
            std::hint::black_box(events);
        });
    });

    group.bench_function("paragraphs", |b| {
        b.iter(|| {
            let paragraphs: Vec<_> = paragraphs(std::hint::black_box(&content).lines()).collect();
            std::hint::black_box(paragraphs);
        });
    });

    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    group.sample_size(10);

    let options = PipelineOptions::default();
    let snippets = MemorySnippetSource::new();
    for sections in [10, 100] {
        let source = LineSource::Text(common::generate_annotated_document(sections));
        group.bench_function(format!("sections_{sections}"), |b| {
            b.iter(|| {
                let notebook = convert(std::hint::black_box(&source), &options, &snippets);
                std::hint::black_box(notebook)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pulldown_cmark_baseline, bench_convert);
criterion_main!(benches);
