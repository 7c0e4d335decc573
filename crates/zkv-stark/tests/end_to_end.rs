//! Honest proofs from the fixture prover verify; the verdict is a pure
//! function of `(proof, key)`.

mod common;

use common::{fixture, small_fri};
use zkv_prover::fixtures;
use zkv_stark::codec::{decode_proof, decode_vk};
use zkv_stark::params::{DEFAULT_MAX_PROOF_BYTES, DEFAULT_MAX_VK_BYTES};
use zkv_stark::{verify, verify_with, FriOptions, VerifyOptions};

#[test]
fn library_fixtures_verify() {
    for name in fixtures::NAMES {
        let fx = fixture(name);
        verify(&fx.proof, &fx.vk).unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn fixtures_survive_the_envelope() {
    let fx = fixture("counter");
    let proof = decode_proof(&fx.proof_bytes().unwrap(), DEFAULT_MAX_PROOF_BYTES).unwrap();
    let vk = decode_vk(&fx.vk_bytes().unwrap(), DEFAULT_MAX_VK_BYTES).unwrap();
    assert_eq!(proof, fx.proof);
    assert_eq!(vk, fx.vk);
    verify(&proof, &vk).unwrap();
}

#[test]
fn other_parameter_sets_verify() {
    let cases = [
        (2, FriOptions { log_blowup: 1, num_queries: 1, log_remainder_len: 1 }),
        (3, FriOptions { log_blowup: 3, num_queries: 30, log_remainder_len: 0 }),
        (6, FriOptions { log_blowup: 1, num_queries: 8, log_remainder_len: 2 }),
    ];
    for (log_n, fri) in cases {
        let fx = fixtures::fibonacci(log_n, fri).unwrap();
        verify(&fx.proof, &fx.vk).unwrap_or_else(|e| panic!("log_n={log_n} {fri:?}: {e}"));
    }
    // Width-2 composition at the smallest blowup that fits it.
    let fx = fixtures::cube_chain(5, FriOptions { log_blowup: 1, ..small_fri() }).unwrap();
    verify(&fx.proof, &fx.vk).unwrap();
}

#[test]
fn verdict_is_deterministic() {
    let fx = fixture("square");
    let first = verify(&fx.proof, &fx.vk);
    for _ in 0..3 {
        assert_eq!(verify(&fx.proof, &fx.vk), first);
    }

    let mut bad = fx.proof.clone();
    bad.ood.trace_z[0] += zkv_stark::Felt::one();
    let first = verify(&bad, &fx.vk);
    assert!(first.is_err());
    assert_eq!(verify(&bad, &fx.vk), first);
}

#[test]
fn parallel_and_sequential_agree() {
    let seq = VerifyOptions { parallel: false };
    let par = VerifyOptions { parallel: true };
    let fx = fixture("fibonacci");
    assert_eq!(verify_with(&fx.proof, &fx.vk, seq), Ok(()));
    assert_eq!(verify_with(&fx.proof, &fx.vk, par), Ok(()));

    // Two bad queries: both modes must report the earlier one.
    let mut bad = fx.proof.clone();
    bad.queries[3].trace[0].values[0] += zkv_stark::Felt::one();
    bad.queries[7].trace.swap(0, 1);
    let s = verify_with(&bad, &fx.vk, seq);
    let p = verify_with(&bad, &fx.vk, par);
    assert!(s.is_err());
    assert_eq!(s, p);
}

#[test]
fn budget_covers_actual_proofs() {
    for name in fixtures::NAMES {
        let fx = fixture(name);
        let size = fx.proof_bytes().unwrap().len() as u64;
        let budget = fx.vk.budget();
        assert!(
            budget.max_proof_bytes >= size,
            "{name}: budget {} < actual {size}",
            budget.max_proof_bytes
        );
        assert!(budget.hash_invocations > 0);
    }
}
