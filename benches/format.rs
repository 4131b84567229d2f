// Benchmarks for markuplift formatting.

use criterion::{criterion_group, criterion_main, Criterion};
use markuplift::{Html5Formatter, XmlFormatter};

fn bench_html5_document(c: &mut Criterion) {
    let html = "<html><body><h1>Hello</h1><p>This is a <strong>simple</strong> document.</p></body></html>";
    let formatter = Html5Formatter::new();
    c.bench_function("html5_document", |b| {
        b.iter(|| formatter.format_str(html, None).unwrap());
    });
}

fn bench_xml_document(c: &mut Criterion) {
    let xml = "<root><item id=\"1\">first</item><item id=\"2\">second</item></root>";
    let formatter = XmlFormatter::new();
    c.bench_function("xml_document", |b| {
        b.iter(|| formatter.format_str(xml, None, false).unwrap());
    });
}

criterion_group!(benches, bench_html5_document, bench_xml_document);
criterion_main!(benches);
