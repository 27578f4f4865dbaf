use autolinker::autolink::passes_typing_gate;
use autolinker::{AutolinkConfig, Session, UrlDetector};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const SHORT_LINE: &str = "Check http://example.com";
const NO_URL_LINE: &str = "This line ends with an ordinary word and nothing else";
const EMAIL_LINE: &str = "Questions can go to support@mail.example.co.uk";

// WHY: Long lines model pasted paragraphs; detection cost must stay linear in the line length
fn long_line() -> String {
    let mut text = "lorem ipsum dolor sit amet ".repeat(400);
    text.push_str("https://docs.example.org/guide/intro?section=3#top");
    text
}

fn bench_url_at_text_end(c: &mut Criterion) {
    let detector = UrlDetector::new().unwrap();
    let long = long_line();

    let mut group = c.benchmark_group("url_at_text_end");
    for (name, text) in [
        ("short_url", SHORT_LINE),
        ("no_url", NO_URL_LINE),
        ("email", EMAIL_LINE),
        ("long_line", long.as_str()),
    ] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(name, |b| b.iter(|| detector.url_at_text_end(black_box(text))));
    }
    group.finish();
}

fn bench_typing_gate(c: &mut Criterion) {
    c.bench_function("typing_gate_reject", |b| b.iter(|| passes_typing_gate(black_box(NO_URL_LINE))));
}

fn bench_typed_sentence(c: &mut Criterion) {
    c.bench_function("type_sentence_with_link", |b| {
        b.iter(|| {
            let mut session = Session::new(AutolinkConfig::default().with_default_protocol("https")).unwrap();
            session.type_text(black_box("Visit google.com and www.example.com today "))
        })
    });
}

criterion_group!(benches, bench_url_at_text_end, bench_typing_gate, bench_typed_sentence);
criterion_main!(benches);
