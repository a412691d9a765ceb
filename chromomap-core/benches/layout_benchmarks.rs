use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chromomap_core::{
    compute_layout, ChromosomeKey, ChromosomeLengths, ColorAssignment, LayoutFilter, LayoutParams,
    Segment, SegmentSet,
};

fn generate_segments(count: usize, labels: usize) -> SegmentSet {
    (0..count)
        .map(|i| {
            let chromosome = ChromosomeKey::autosome((i % 22 + 1) as u8).unwrap();
            let start = (i as u64 % 100) * 1_000_000;
            Segment {
                chromosome,
                start,
                end: start + 500_000,
                label: format!("match{}", i % labels),
            }
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let lengths = ChromosomeLengths::default();
    let params = LayoutParams::default();
    let filter = LayoutFilter::default();

    for (name, count, labels) in [
        ("layout_100_segments", 100, 5),
        ("layout_2000_segments", 2000, 20),
    ] {
        let segments = generate_segments(count, labels);
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut colors = ColorAssignment::new();
                let result = compute_layout(
                    black_box(&segments),
                    &lengths,
                    &filter,
                    &mut colors,
                    &params,
                );
                black_box(result)
            })
        });
    }
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
