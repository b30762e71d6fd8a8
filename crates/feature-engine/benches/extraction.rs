use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::FeatureExtractor;

fn bench_extract(c: &mut Criterion) {
    let fs = 10240.0;
    let signal: Vec<f64> = (0..10240)
        .map(|i| (2.0 * std::f64::consts::PI * 600.0 * i as f64 / fs).sin())
        .collect();
    let names: Vec<String> = ["RMS", "Kurtosis", "CrestFactor", "MEDIAN", "Estimated Speed"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut extractor = FeatureExtractor::new(fs, 6);
    c.bench_function("extract_time_and_spectral_1s", |b| {
        b.iter(|| extractor.extract(black_box(&signal), black_box(&names)))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
