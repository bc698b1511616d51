use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use editor_analysis::{BracketIndex, DocumentAnalyzer, FoldingEngine, LanguageConfig, LineIndex};

fn large_source(function_count: usize) -> String {
    let mut out = String::with_capacity(function_count * 96);
    for i in 0..function_count {
        out.push_str(&format!(
            "fn handler_{i:05}(input: &[u8]) -> Result<(), Error> {{\n    let v = vec![input[0], (input[1] + 2)];\n    log(\"{{}}\", v); // ({i})\n}}\n"
        ));
    }
    out
}

fn bench_bracket_rebuild(c: &mut Criterion) {
    let text = large_source(10_000);
    let mut index = BracketIndex::new(LanguageConfig::rust());
    c.bench_function("bracket_rebuild/10k_functions", |b| {
        b.iter(|| {
            index.rebuild(black_box(&text));
            black_box(index.len());
        })
    });
}

fn bench_bracket_lookup(c: &mut Criterion) {
    let text = large_source(10_000);
    let mut index = BracketIndex::new(LanguageConfig::rust());
    index.rebuild(&text);
    let probe = text.chars().count() / 2;

    c.bench_function("bracket_lookup/1000_cursors", |b| {
        b.iter(|| {
            for offset in probe..probe + 1000 {
                black_box(index.match_near_cursor(offset));
            }
        })
    });
}

fn bench_fold_all(c: &mut Criterion) {
    let buffer = LineIndex::from_text(&large_source(10_000));
    c.bench_function("fold_all/40k_lines", |b| {
        b.iter_batched(
            || FoldingEngine::new(LanguageConfig::rust()),
            |mut folding| {
                folding.fold_all(&buffer);
                black_box(folding.hidden_line_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_visible_lines(c: &mut Criterion) {
    let buffer = LineIndex::from_text(&large_source(10_000));
    let mut folding = FoldingEngine::new(LanguageConfig::rust());
    folding.fold_all(&buffer);
    let line_count = buffer.line_count();

    c.bench_function("visible_lines/40k_lines_folded", |b| {
        b.iter(|| black_box(folding.visible_lines(line_count).len()))
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_source(2_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || DocumentAnalyzer::new(&text, LanguageConfig::rust()),
            |mut analyzer| {
                let mut offset = analyzer.buffer().char_count() / 2;
                for _ in 0..100 {
                    analyzer.apply_edit(offset, 0, "x").unwrap();
                    offset += 1;
                }
                black_box(analyzer.version());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_bracket_rebuild,
    bench_bracket_lookup,
    bench_fold_all,
    bench_visible_lines,
    bench_typing_in_middle
);
criterion_main!(benches);
