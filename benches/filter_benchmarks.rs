//! Benchmarks for series filter performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pose2anim::extraction::AngleSample;
use pose2anim::filters::{
    multi_line_fitting::MultiLineFitting, resample::Resampler, trembling::TremblingFilter, NoFilter, SeriesFilter,
};

/// Noisy swinging bone sampled at 30 fps
fn noisy_series(len: usize) -> Vec<AngleSample> {
    (0..len)
        .map(|i| {
            let t = i as f64 / 30.0;
            let angle = 40.0 * (2.0 * t).sin() + 2.0 * rand::random::<f64>();
            AngleSample::new(t, angle)
        })
        .collect()
}

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let test_data = noisy_series(900);

    let filter_configs = vec![
        ("no_filter", Box::new(NoFilter) as Box<dyn SeriesFilter>),
        ("trembling_7hz", Box::new(TremblingFilter::new(1.0 / 7.0))),
        ("mlf_0.1", Box::new(MultiLineFitting::new(0.1))),
        ("mlf_0.01", Box::new(MultiLineFitting::new(0.01))),
        ("resample_10", Box::new(Resampler::new(10))),
    ];

    for (name, filter) in filter_configs {
        group.bench_with_input(BenchmarkId::new("series_900", name), &test_data, |b, data| {
            b.iter(|| black_box(filter.apply(black_box(data))));
        });
    }

    group.finish();
}

fn benchmark_mlf_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("mlf_scaling");
    let fit = MultiLineFitting::new(0.02);

    for len in [100, 1_000, 10_000] {
        let data = noisy_series(len);
        group.bench_with_input(BenchmarkId::new("samples", len), &data, |b, data| {
            b.iter(|| black_box(fit.kept_indices(black_box(data))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_filters, benchmark_mlf_scaling);
criterion_main!(benches);
