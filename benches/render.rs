//! Benchmarks for the rendering pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use mmd_html::html::escape_html;
use mmd_html::{
    Document, Kind, Metadata, NodeId, Options, ReferenceTable, render_complete, render_fragment,
};

const SECTIONS: usize = 200;

/// A document of headings, paragraphs with inline markup, footnotes and
/// tight lists, preceded by a table of contents.
fn build_sample() -> (Document, ReferenceTable) {
    let mut doc = Document::new();
    let mut refs = ReferenceTable::new();
    doc.leaf(NodeId::ROOT, Kind::TocPlaceholder, "{{TOC}}\n");

    for i in 0..SECTIONS {
        let heading = doc.open(NodeId::ROOT, Kind::Heading(1 + (i % 3) as u8));
        doc.leaf(heading, Kind::MarkerHeading, "# ");
        doc.leaf(heading, Kind::TextPlain, &format!("Section {i}"));
        doc.close(heading);

        let para = doc.open(NodeId::ROOT, Kind::Paragraph);
        doc.leaf(para, Kind::TextPlain, "Some text with ");
        let open = doc.leaf(para, Kind::EmphStart, "*");
        doc.leaf(para, Kind::TextPlain, "emphasis & <markup>");
        let close = doc.leaf(para, Kind::EmphStop, "*");
        doc.pair(open, close);
        doc.leaf(para, Kind::Apostrophe, "'");
        doc.leaf(para, Kind::TextPlain, "s and a note");

        let note = doc.open(para, Kind::PairBracketFootnote);
        let left = doc.leaf(note, Kind::BracketFootnoteLeft, "[^");
        doc.leaf(note, Kind::TextPlain, &format!("n{}", i % 20));
        let right = doc.leaf(note, Kind::BracketRight, "]");
        doc.close(note);
        doc.pair(left, right);
        doc.close(para);

        let list = doc.open(NodeId::ROOT, Kind::ListBulleted);
        for item_text in ["alpha", "beta", "gamma"] {
            let item = doc.open(list, Kind::ListItemTight);
            doc.leaf(item, Kind::MarkerListBullet, "* ");
            doc.leaf(item, Kind::TextPlain, item_text);
            doc.close(item);
        }
        doc.close(list);
    }

    for i in 0..20 {
        let holder = doc.detached(Kind::Empty);
        let def = doc.open(holder, Kind::DefFootnote);
        doc.leaf(def, Kind::TextPlain, &format!("Footnote number {i}."));
        doc.close(def);
        refs.add_footnote(&format!("n{i}"), doc.first_child(holder));
    }

    (doc, refs)
}

fn bench_render_fragment(c: &mut Criterion) {
    let (doc, refs) = build_sample();
    let meta = Metadata::new();

    c.bench_function("render_fragment", |b| {
        b.iter(|| render_fragment(&doc, &refs, &meta, Options::default()));
    });
}

fn bench_render_complete(c: &mut Criterion) {
    let (doc, refs) = build_sample();
    let meta = Metadata::new()
        .with("Title", "Benchmark")
        .with("Author", "Nobody");

    c.bench_function("render_complete", |b| {
        b.iter(|| render_complete(&doc, &refs, &meta, Options::default()));
    });
}

fn bench_escape(c: &mut Criterion) {
    let plain = "plain text without reserved characters ".repeat(500);
    let busy = "a < b && c > \"d\" ".repeat(500);

    c.bench_function("escape_plain", |b| b.iter(|| escape_html(&plain)));
    c.bench_function("escape_busy", |b| b.iter(|| escape_html(&busy)));
}

criterion_group!(
    benches,
    bench_render_fragment,
    bench_render_complete,
    bench_escape,
);
criterion_main!(benches);
