use criterion::{black_box, criterion_group, criterion_main, Criterion};
use yaml_bump::{diff, update_image_tags, update_keys, Document};

fn large_values_file(services: usize) -> String {
    let mut out = String::from("# Generated chart values.\nglobal:\n  domain: example.com\n\n");
    for i in 0..services {
        out.push_str(&format!(
            "service{i}:\n  replicas: {r}\n  image:\n    repository: ghcr.io/acme/service{i}\n    tag: v1.{i}.0  # pinned\n  resources:\n    limits:\n      cpu: 500m\n      memory: \"512Mi\"\n",
            r = i % 5 + 1,
        ));
    }
    out
}

fn bench_parse_roundtrip(c: &mut Criterion) {
    let text = large_values_file(100);
    c.bench_function("parse_and_dump_100_services", |b| {
        b.iter(|| {
            let doc = Document::parse(black_box(&text)).unwrap();
            black_box(doc.dump());
        })
    });
}

fn bench_key_updates(c: &mut Criterion) {
    let text = large_values_file(100);
    let updates: Vec<(String, String)> = (0..100)
        .map(|i| (format!("service{i}.image.tag"), format!("v2.{i}.0")))
        .collect();
    c.bench_function("update_100_keys", |b| {
        b.iter(|| {
            let doc = Document::parse(black_box(&text)).unwrap();
            update_keys(&doc, black_box(&updates)).unwrap();
            black_box(doc.dump());
        })
    });
}

fn bench_image_walk(c: &mut Criterion) {
    let text = large_values_file(100);
    c.bench_function("image_walk_100_services", |b| {
        b.iter(|| {
            let doc = Document::parse(black_box(&text)).unwrap();
            black_box(update_image_tags(&doc, "service50", "v9.0.0"));
        })
    });
}

fn bench_diff(c: &mut Criterion) {
    let before = large_values_file(100);
    let doc = Document::parse(&before).unwrap();
    update_image_tags(&doc, "service50", "v9.0.0");
    let after = doc.dump();
    c.bench_function("diff_large_file", |b| {
        b.iter(|| black_box(diff("values.yaml", black_box(&before), black_box(&after))))
    });
}

criterion_group!(
    benches,
    bench_parse_roundtrip,
    bench_key_updates,
    bench_image_walk,
    bench_diff
);
criterion_main!(benches);
