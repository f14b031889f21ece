use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feature_prep::backend::{CpuBackend, Tensor2D};
use feature_prep::preprocessing::{FeaturePreparer, FittedTransformer, Power, Transformer};

fn sample_matrix(rows: usize, cols: usize) -> Tensor2D<CpuBackend> {
    let data = (0..rows * cols)
        .map(|i| {
            if i % cols == 0 {
                (i / cols % 2) as f64
            } else {
                ((i * 31) % 97) as f64 * 0.1
            }
        })
        .collect();
    Tensor2D::new(data, rows, cols)
}

fn all_powers() -> Vec<Power> {
    vec![
        Power::Identity,
        Power::Exponent(2),
        Power::Exponent(3),
        Power::PairwiseProduct,
        Power::Log,
        Power::Exp,
    ]
}

fn bench_fit_transform(c: &mut Criterion) {
    for rows in [100, 1000, 10000].iter() {
        c.bench_with_input(BenchmarkId::new("fit_transform", rows), rows, |b, &n| {
            let x = sample_matrix(n, 8);
            let preparer = FeaturePreparer::<CpuBackend>::with_powers(all_powers());

            b.iter(|| {
                let prepared = preparer.fit_transform(black_box(&x));
                black_box(prepared).ok();
            });
        });
    }
}

fn bench_transform(c: &mut Criterion) {
    for rows in [100, 1000, 10000].iter() {
        c.bench_with_input(BenchmarkId::new("transform", rows), rows, |b, &n| {
            let x = sample_matrix(n, 8);
            let fitted = match FeaturePreparer::<CpuBackend>::with_powers(all_powers()).fit(&x) {
                Ok(fitted) => fitted,
                Err(e) => panic!("fit failed: {}", e),
            };

            b.iter(|| {
                let prepared = fitted.transform(black_box(&x));
                black_box(prepared).ok();
            });
        });
    }
}

fn bench_pairwise_width(c: &mut Criterion) {
    for cols in [4, 16, 32].iter() {
        c.bench_with_input(BenchmarkId::new("pairwise_expand", cols), cols, |b, &k| {
            let x = sample_matrix(500, k);
            let preparer = FeaturePreparer::<CpuBackend>::with_powers([Power::PairwiseProduct]);

            b.iter(|| {
                let expanded = preparer.expand(black_box(&x));
                black_box(expanded).ok();
            });
        });
    }
}

criterion_group!(
    benches,
    bench_fit_transform,
    bench_transform,
    bench_pairwise_width
);
criterion_main!(benches);
