use zkv_ffts::Goldilocks as F;
use zkv_prover::{fixtures, prove, setup};
use zkv_stark::air::library;
use zkv_stark::{verify, FriOptions};

fn fri() -> FriOptions {
    FriOptions {
        log_blowup: 2,
        num_queries: 8,
        log_remainder_len: 1,
    }
}

#[test]
fn every_fixture_verifies() {
    for name in fixtures::NAMES {
        let fx = fixtures::by_name(name, 4, fri()).unwrap();
        assert_eq!(fx.proof.public_inputs, fx.public_inputs);
        verify(&fx.proof, &fx.vk).unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn unknown_fixture_is_an_error() {
    assert!(fixtures::by_name("lucas", 4, fri()).is_err());
}

#[test]
fn proving_is_deterministic() {
    let a = fixtures::square_chain(3, fri()).unwrap();
    let b = fixtures::square_chain(3, fri()).unwrap();
    assert_eq!(a.proof, b.proof);
    assert_eq!(a.proof_bytes().unwrap(), b.proof_bytes().unwrap());
}

#[test]
fn remainder_respects_bound() {
    let fx = fixtures::cube_chain(5, fri()).unwrap();
    assert!(fx.proof.fri.remainder.len() <= 1 << fri().log_remainder_len);
    assert_eq!(fx.proof.fri.layer_roots.len() as u32, fx.vk.num_folds() - 1);
}

#[test]
fn rejects_unsatisfying_trace() {
    let (pk, _) = setup(library::square_chain(), 1, Vec::new(), 3, fri()).unwrap();
    let mut x: Vec<F> = vec![F::from_u64(3); 8];
    for i in 1..8 {
        x[i] = x[i - 1].square();
    }
    x[4] += F::one();
    let public = [x[0], x[7]];
    let err = prove(&pk, &[x], &public).unwrap_err();
    assert!(err.to_string().contains("transition"), "{err}");
}

#[test]
fn rejects_wrong_boundary() {
    let (pk, _) = setup(library::square_chain(), 1, Vec::new(), 3, fri()).unwrap();
    let mut x: Vec<F> = vec![F::from_u64(3); 8];
    for i in 1..8 {
        x[i] = x[i - 1].square();
    }
    let public = [x[0], x[7] + F::one()];
    let err = prove(&pk, &[x], &public).unwrap_err();
    assert!(err.to_string().contains("boundary"), "{err}");
}

#[test]
fn rejects_bad_shapes() {
    let (pk, _) = setup(library::fibonacci(), 2, Vec::new(), 3, fri()).unwrap();
    let col = vec![F::one(); 8];
    assert!(prove(&pk, &[col.clone()], &[F::one(); 3]).is_err());
    assert!(prove(&pk, &[col.clone(), col[..4].to_vec()], &[F::one(); 3]).is_err());
    assert!(prove(&pk, &[col.clone(), col], &[F::one(); 2]).is_err());
}

#[test]
fn setup_rejects_out_of_range_keys() {
    // Blowup of 1 leaves no room for the width-2 cube composition.
    let tight = FriOptions {
        log_blowup: 0,
        ..fri()
    };
    assert!(setup(library::cube_chain(), 1, Vec::new(), 3, tight).is_err());
    // Fixed column of the wrong length.
    assert!(setup(library::counter_with_fixed_step(), 1, vec![vec![F::one(); 4]], 3, fri()).is_err());
}
