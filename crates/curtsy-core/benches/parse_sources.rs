//! Benchmarks for tokenizing and parsing annotated sources
//!
//! Inputs are synthetic C# files built from a repeated block mixing doc
//! comments, block comments, literals and type declarations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use curtsy_core::doc::{ParseOptions, SectionBuilder, TypeRegistry};
use curtsy_core::{parse_source, Lexer};

const BLOCK: &str = r#"/// <summary>
/// Item {n} of the benchmark input.
/// </summary>
public class Item{n}<T> where T : class
{
    /* field comment
       spanning lines */
    private string name = "item \"{n}\"";
    private char sep = '\'';

    public delegate void Changed{n}(T value); // notify
}

"#;

/// Generate a source file with `count` type blocks
fn generate_source(count: usize) -> String {
    (0..count)
        .map(|n| BLOCK.replace("{n}", &n.to_string()))
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for count in [10, 100, 1_000] {
        let source = generate_source(count);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
            b.iter(|| black_box(Lexer::tokenize(source).unwrap()));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for count in [10, 100, 1_000] {
        let source = generate_source(count);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
            b.iter(|| {
                let mut registry = TypeRegistry::new();
                let events = parse_source(source, "Bench.cs", &mut registry).unwrap();
                black_box(registry.len());
                black_box(events)
            });
        });
    }

    group.finish();
}

fn bench_sections(c: &mut Criterion) {
    let source = generate_source(1_000);
    let mut registry = TypeRegistry::new();
    let events = parse_source(&source, "Bench.cs", &mut registry).unwrap();
    let builder = SectionBuilder::new(ParseOptions::default());

    c.bench_function("build_sections_1000", |b| {
        b.iter(|| black_box(builder.build(&events)));
    });
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_sections);
criterion_main!(benches);
