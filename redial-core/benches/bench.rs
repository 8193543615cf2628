use criterion::{black_box, criterion_group, criterion_main, Criterion};
use redial_core::{parse, render, transpile, Dialect};

const IDENTIFIER: &str = r"[a-zA-Z_][a-zA-Z0-9_]*";
const EMAIL: &str = r"(?P<user>[a-zA-Z0-9._%+-]+)@(?P<host>[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})";
const STRING_LITERAL: &str = r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'"#;
const LOOKAROUND: &str = r"(?<=\$)\d+(?:\.\d{2})?(?!\d)";

fn bench_parse_simple(c: &mut Criterion) {
    c.bench_function("parse_identifier", |b| {
        b.iter(|| black_box(parse(black_box(IDENTIFIER))))
    });
}

fn bench_parse_named_groups(c: &mut Criterion) {
    c.bench_function("parse_email", |b| {
        b.iter(|| black_box(parse(black_box(EMAIL))))
    });
}

fn bench_render(c: &mut Criterion) {
    let ast = parse(STRING_LITERAL).unwrap();

    c.bench_function("render_string_literal_java", |b| {
        b.iter(|| black_box(render(black_box(&Dialect::JAVA), black_box(&ast))))
    });
}

fn bench_transpile_all_dialects(c: &mut Criterion) {
    c.bench_function("transpile_all_dialects", |b| {
        b.iter(|| {
            for dialect in Dialect::ALL {
                let _ = black_box(transpile(&dialect, black_box(LOOKAROUND)));
            }
        })
    });
}

fn bench_deep_nesting(c: &mut Criterion) {
    let pattern = format!("{}a{}", "(".repeat(90), ")".repeat(90));

    c.bench_function("transpile_deep_nesting", |b| {
        b.iter(|| black_box(transpile(&Dialect::PYTHON, black_box(&pattern))))
    });
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_named_groups,
    bench_render,
    bench_transpile_all_dialects,
    bench_deep_nesting,
);

criterion_main!(benches);
