//! Round-trip and field-law tests.
//!
//! - coeffs --NTT--> evals --INTT--> coeffs over many sizes;
//! - field axioms on random Goldilocks elements (proptest);
//! - serde rejects non-canonical encodings.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use zkv_ffts::{
    ntt::{evaluate_on_pow2_domain, forward_ntt_in_place, interpolate_from_evals, inverse_ntt_in_place},
    Goldilocks as F, GOLDILOCKS,
};

#[track_caller]
fn det_vec(n: usize, seed: u64) -> Vec<F> {
    let mut a = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..n)
        .map(|_| {
            a ^= a << 13;
            a ^= a >> 7;
            a ^= a << 17;
            F::from_u64(a)
        })
        .collect()
}

#[test]
fn ntt_roundtrip_various_sizes() {
    for k in 0..=12 {
        let n = 1usize << k;
        let mut v = det_vec(n, 1_337 + k as u64);
        let original = v.clone();

        forward_ntt_in_place(&mut v);
        inverse_ntt_in_place(&mut v);

        assert_eq!(v, original, "round-trip failed (n = 2^{k})");
    }
}

#[test]
fn delta_transforms_to_all_ones() {
    let mut v = vec![F::zero(); 64];
    v[0] = F::one();
    forward_ntt_in_place(&mut v);
    assert!(v.iter().all(|x| *x == F::one()));
    inverse_ntt_in_place(&mut v);
    assert_eq!(v[0], F::one());
    assert!(v[1..].iter().all(|x| x.is_zero()));
}

#[test]
fn evaluate_then_interpolate_pads_with_zeros() {
    let coeffs = det_vec(5, 9);
    let evals = evaluate_on_pow2_domain(&coeffs, 4);
    let back = interpolate_from_evals(&evals);
    assert_eq!(&back[..5], &coeffs[..]);
    assert!(back[5..].iter().all(|x| x.is_zero()));
}

#[test]
fn serde_rejects_non_canonical() {
    let ok = bincode::serialize(&F::from_u64(17)).unwrap();
    assert_eq!(bincode::deserialize::<F>(&ok).unwrap(), F::from_u64(17));

    let bad = bincode::serialize(&GOLDILOCKS).unwrap();
    assert!(bincode::deserialize::<F>(&bad).is_err());
}

fn felt() -> impl Strategy<Value = F> {
    any::<u64>().prop_map(F::from_u64)
}

proptest! {
    #[test]
    fn field_ring_laws(a in felt(), b in felt(), c in felt()) {
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!(a * b, b * a);
        prop_assert_eq!((a + b) + c, a + (b + c));
        prop_assert_eq!((a * b) * c, a * (b * c));
        prop_assert_eq!(a * (b + c), a * b + a * c);
        prop_assert_eq!(a - a, F::zero());
        prop_assert_eq!(a + (-a), F::zero());
    }

    #[test]
    fn inverse_law(a in felt()) {
        match a.try_inv() {
            None => prop_assert!(a.is_zero()),
            Some(ai) => prop_assert_eq!(a * ai, F::one()),
        }
    }

    #[test]
    fn u128_reduction_matches_mul(a in any::<u64>(), b in any::<u64>()) {
        let wide = u128::from(a) * u128::from(b);
        prop_assert_eq!(F::from_u128(wide), F::from_u64(a) * F::from_u64(b));
    }
}
