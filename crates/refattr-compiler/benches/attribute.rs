use criterion::{black_box, criterion_group, criterion_main, Criterion};

use refattr_compiler::{attributor_from_supplier, build_index, BundledDatabase, DatabaseSupplier};

const CASES: &[(&str, Option<&str>)] = &[
    ("https://shop.example.com/", None),
    ("https://shop.example.com/?gclid=G1&utm_campaign=spring%20sale", None),
    (
        "https://shop.example.com/landing?utm_source=newsletter&utm_medium=email",
        Some("https://mail.google.com/mail/u/0/"),
    ),
    ("https://shop.example.com/", Some("https://www.google.co.uk/search?q=running+shoes")),
    ("https://shop.example.co.uk/cart", Some("https://www.example.co.uk/")),
    ("https://shop.example.com/", Some("https://blog.unknown-site.org/post/1")),
];

fn bench_attribute(c: &mut Criterion) {
    let attributor = attributor_from_supplier(&BundledDatabase);

    c.bench_function("attribute_mixed", |b| {
        b.iter(|| {
            for (url, referrer) in CASES {
                black_box(attributor.attribute(black_box(url), black_box(*referrer)));
            }
        })
    });
}

fn bench_build_index(c: &mut Criterion) {
    let database = BundledDatabase.referrer_database(false);
    c.bench_function("build_index", |b| b.iter(|| build_index(black_box(&database))));
}

criterion_group!(benches, bench_attribute, bench_build_index);
criterion_main!(benches);
