use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use textenv::{Corpus, TagParser, TextBase, TextBaseLoader, TextEnv, Tokenizer};

const SENTENCE: &str = "The committee, led by <person>Anna Lindqvist</person>, met in <place>Uppsala</place> on 3 March to discuss the budget of <org>Nordic Rail AB</org>. ";

fn tagged_text(sentences: usize) -> String {
    SENTENCE.repeat(sentences)
}

pub fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = Tokenizer::default();
    let parser = TagParser::new();
    let mut group = c.benchmark_group("tokenize");
    for size in [10, 100, 1000] {
        let text = parser.parse("bench", &tagged_text(size)).expect("parse").text;
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| {
                let tokens = tokenizer.tokenize(black_box(text));
                assert!(!tokens.is_empty());
            })
        });
    }
    group.finish();

    let text = "lorem ipsum dolor sit amet ".repeat(1000);
    c.bench_function("load_document", |b| {
        b.iter(|| {
            let mut textbase = TextBase::default();
            textbase
                .load_document("doc", black_box(text.as_str()))
                .expect("document must load");
        })
    });
}

pub fn bench_tagparser(c: &mut Criterion) {
    let parser = TagParser::new();
    let mut group = c.benchmark_group("tagparse");
    for size in [10, 100, 1000] {
        let raw = tagged_text(size);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| {
                let tagged = parser.parse("bench", black_box(raw)).expect("parse");
                assert_eq!(tagged.annotations.len(), size * 3);
            })
        });
    }
    group.finish();
}

pub fn bench_not_instances(c: &mut Criterion) {
    let loader = TextBaseLoader::default();
    let mut corpus: Corpus = loader.new_corpus().expect("corpus");
    loader
        .load_tagged_str(&mut corpus, "doc", &tagged_text(5))
        .expect("tagged document must load");
    let labels = corpus.labels();

    c.bench_function("not_instances", |b| {
        b.iter(|| {
            let count = labels
                .not_instances(black_box("person"), "doc")
                .expect("closed type")
                .count();
            assert!(count > 0);
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_tagparser, bench_not_instances);
criterion_main!(benches);
