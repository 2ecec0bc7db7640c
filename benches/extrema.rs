//! Run these benches with `cargo bench --bench extrema -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array2;

use synoptic::extrema::{find_local_minima, MinimaSearch};
use synoptic::field::ScalarField;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(extrema_benches);

criterion_group!(
    name = extrema_benches;
    config = build_tester();
    targets = find_minima_bench, find_minima_strict_bench
);

/// A global 2.5 degree pressure field with a handful of synthetic lows,
/// matching the grid the reference reanalysis file uses.
fn build_field() -> ScalarField {
    let height = 73;
    let width = 144;
    let lat: Vec<f64> = (0..height).map(|i| 90.0 - 2.5 * i as f64).collect();
    let lon: Vec<f64> = (0..width).map(|i| 2.5 * i as f64).collect();

    let centers = [(15usize, 30usize), (40, 90), (55, 120), (20, 135)];
    let mut data = Array2::from_elem((height, width), 1015.0f32);
    for ((r, c), value) in data.indexed_iter_mut() {
        for &(cr, cc) in &centers {
            let dr = r as f32 - cr as f32;
            let dc = c as f32 - cc as f32;
            let dist_sq = dr * dr + dc * dc;
            if dist_sq <= 64.0 {
                *value -= 0.02 * (64.0 - dist_sq);
            }
        }
    }

    ScalarField::new(data, lat, lon).unwrap()
}

fn find_minima_bench(c: &mut Criterion) {
    let field = build_field();
    let search = MinimaSearch::default();

    c.bench_function("find_local_minima", |b| {
        b.iter(|| {
            let minima = find_local_minima(&field, &search);
            assert!(!minima.is_empty());
        });
    });
}

fn find_minima_strict_bench(c: &mut Criterion) {
    let field = build_field();
    let search = MinimaSearch {
        strict: true,
        ..MinimaSearch::default()
    };

    c.bench_function("find_local_minima_strict", |b| {
        b.iter(|| {
            let _minima = find_local_minima(&field, &search);
        });
    });
}
