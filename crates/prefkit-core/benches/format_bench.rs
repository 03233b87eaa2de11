//! Criterion benchmarks for the prefkit format codecs.
//!
//! Settings files are read once per tool launch and rewritten on every
//! change, so whole-file encode/decode latency is what matters.
//!
//! Run with:
//! ```bash
//! cargo bench --package prefkit-core --bench format_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prefkit_core::format::{json, text};
use prefkit_core::{parse_literal, IniDocument, SettingValue, SettingsMap};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_settings(count: usize) -> SettingsMap {
    let mut settings = SettingsMap::new();
    for i in 0..count {
        let value = match i % 5 {
            0 => SettingValue::Int(i as i64),
            1 => SettingValue::Float(i as f64 * 0.25),
            2 => SettingValue::Bool(i % 2 == 0),
            3 => SettingValue::Str(format!("/mnt/shows/seq_{i:03}/shot.ma")),
            _ => SettingValue::from(vec![i as i64, (i * 2) as i64]),
        };
        settings.insert(format!("setting_{i}"), value);
    }
    settings
}

fn make_ini(sections: usize, options: usize) -> String {
    let mut doc = IniDocument::new();
    for s in 0..sections {
        for o in 0..options {
            doc.set(&format!("Section{s}"), &format!("option_{o}"), format!("{}", o * s));
        }
    }
    doc.render()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal");
    for input in ["0.75", "True", "\"/mnt/shows/abc/shot_010.ma\"", "[640, 480, [1, 2], None]"] {
        group.bench_with_input(BenchmarkId::new("parse", input), input, |b, input| {
            b.iter(|| parse_literal(black_box(input)))
        });
    }
    group.finish();
}

fn bench_text_and_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_formats");
    for count in [10usize, 100, 1000] {
        let settings = make_settings(count);
        let text_file = text::encode(&settings).expect("encode text");
        let json_file = json::encode(&settings).expect("encode json");

        group.bench_with_input(BenchmarkId::new("text_decode", count), &text_file, |b, f| {
            b.iter(|| text::decode(black_box(f)))
        });
        group.bench_with_input(BenchmarkId::new("json_decode", count), &json_file, |b, f| {
            b.iter(|| json::decode(black_box(f)))
        });
        group.bench_with_input(BenchmarkId::new("text_encode", count), &settings, |b, s| {
            b.iter(|| text::encode(black_box(s)))
        });
    }
    group.finish();
}

fn bench_ini(c: &mut Criterion) {
    let mut group = c.benchmark_group("ini");
    for (sections, options) in [(4usize, 8usize), (32, 32)] {
        let file = make_ini(sections, options);
        let label = format!("{sections}x{options}");
        group.bench_with_input(BenchmarkId::new("parse", &label), &file, |b, f| {
            b.iter(|| IniDocument::parse(black_box(f)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_literal, bench_text_and_json, bench_ini);
criterion_main!(benches);
