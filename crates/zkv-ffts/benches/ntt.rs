use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use zkv_ffts::{
    coset::{evaluate_on_coset_pow2, interpolate_on_coset_pow2},
    ntt::{forward_ntt_in_place, inverse_ntt_in_place},
    poly::batch_inverse,
    Goldilocks as F, GENERATOR,
};

fn det_vec(n: usize, seed: u64) -> Vec<F> {
    let mut a = seed | 1;
    (0..n)
        .map(|i| {
            a = a.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            F::from_u64(a ^ (i as u64))
        })
        .collect()
}

fn bench_ntt(c: &mut Criterion) {
    let mut group = c.benchmark_group("ntt_goldilocks_pow2");
    for &k in &[12u32, 16u32] {
        let n = 1usize << k;
        group.throughput(Throughput::Elements(n as u64));
        let base = det_vec(n, 2024);

        group.bench_function(BenchmarkId::new("forward_ntt_in_place", format!("2^{k}")), |b| {
            b.iter_batched(
                || base.clone(),
                |mut v| {
                    forward_ntt_in_place(black_box(&mut v));
                    v
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("inverse_ntt_in_place", format!("2^{k}")), |b| {
            b.iter_batched(
                || base.clone(),
                |mut v| {
                    inverse_ntt_in_place(black_box(&mut v));
                    v
                },
                BatchSize::LargeInput,
            );
        });

        // Blowup-4 coset LDE, the fixture prover's hot path.
        let quarter = &base[..n / 4];
        group.bench_function(BenchmarkId::new("coset_lde_x4", format!("2^{k}")), |b| {
            b.iter(|| {
                let evals = evaluate_on_coset_pow2(black_box(quarter), k, GENERATOR);
                black_box(interpolate_on_coset_pow2(&evals, GENERATOR))
            });
        });

        group.bench_function(BenchmarkId::new("batch_inverse", format!("2^{k}")), |b| {
            b.iter(|| black_box(batch_inverse(black_box(&base))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ntt);
criterion_main!(benches);
