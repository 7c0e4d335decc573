use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zkv_prover::fixtures;
use zkv_stark::codec::{decode_proof, decode_vk};
use zkv_stark::params::{DEFAULT_MAX_PROOF_BYTES, DEFAULT_MAX_VK_BYTES};
use zkv_stark::{verify_with, FriOptions, VerifyOptions};

fn bench_verify(c: &mut Criterion) {
    zkv_stark::initialize();
    let fri = FriOptions {
        log_blowup: 2,
        num_queries: 32,
        log_remainder_len: 2,
    };

    let mut group = c.benchmark_group("verify");
    for &log_n in &[8u32, 12u32] {
        let fx = fixtures::fibonacci(log_n, fri).expect("fixture");
        let proof_bytes = fx.proof_bytes().expect("encode proof");
        let vk_bytes = fx.vk_bytes().expect("encode vk");
        group.throughput(Throughput::Bytes(proof_bytes.len() as u64));

        for (label, parallel) in [("sequential", false), ("parallel", true)] {
            let opts = VerifyOptions { parallel };
            group.bench_function(BenchmarkId::new(label, format!("2^{log_n}")), |b| {
                b.iter(|| black_box(verify_with(black_box(&fx.proof), &fx.vk, opts)));
            });
        }

        // Decoding included, as an embedder sees it.
        group.bench_function(BenchmarkId::new("decode_and_verify", format!("2^{log_n}")), |b| {
            b.iter(|| {
                let vk = decode_vk(black_box(&vk_bytes), DEFAULT_MAX_VK_BYTES).expect("vk");
                let proof = decode_proof(black_box(&proof_bytes), DEFAULT_MAX_PROOF_BYTES).expect("proof");
                black_box(verify_with(&proof, &vk, VerifyOptions::default()))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_verify);
criterion_main!(benches);
