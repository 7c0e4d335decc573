//! In-place radix-2 Cooley–Tukey NTT/INTT for Goldilocks.
//!
//! The forward transform maps coefficients to evaluations over a `2^k`
//! subgroup (natural order), the inverse maps evaluations back. Stage
//! twiddles come from [`crate::twiddle::all_stage_twiddles`].

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use crate::twiddle::all_stage_twiddles;
use crate::Goldilocks as F;

#[inline]
fn bit_reverse_permute(a: &mut [F]) {
    let n = a.len();
    debug_assert!(n.is_power_of_two());
    let bits = n.trailing_zeros();
    if bits == 0 {
        return;
    }
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if j > i {
            a.swap(i, j);
        }
    }
}

/// Shared DIT butterfly network; `inverse` selects the twiddle direction.
fn transform(a: &mut [F], inverse: bool) {
    let n = a.len();
    if n <= 1 {
        return;
    }
    assert!(n.is_power_of_two(), "NTT size must be power of two");
    bit_reverse_permute(a);

    let n_log2 = n.trailing_zeros();
    let tw = all_stage_twiddles(n_log2, inverse);

    for (stage, w_stage) in tw.iter().enumerate() {
        let half = 1usize << stage;
        let len = half << 1;
        for block in a.chunks_exact_mut(len) {
            let (lo, hi) = block.split_at_mut(half);
            for ((u, v), w) in lo.iter_mut().zip(hi.iter_mut()).zip(w_stage) {
                let t = *v * *w;
                let x = *u;
                *u = x + t;
                *v = x - t;
            }
        }
    }
}

/// Forward NTT in place (coefficients → values). Length must be a power of two.
///
/// # Panics
/// Panics if the length is not a power of two.
pub fn forward_ntt_in_place(a: &mut [F]) {
    transform(a, false);
}

/// Inverse NTT in place (values → coefficients). Length must be a power of two.
///
/// # Panics
/// Panics if the length is not a power of two.
pub fn inverse_ntt_in_place(a: &mut [F]) {
    let n = a.len();
    transform(a, true);
    if n <= 1 {
        return;
    }
    let inv_n = F::from_u64(n as u64).inv();
    for x in a.iter_mut() {
        *x *= inv_n;
    }
}

/// Evaluate a polynomial (given by coefficients) on a `2^k` domain.
///
/// Shorter inputs are zero-padded; longer inputs are truncated to `2^k`
/// coefficients.
#[must_use]
pub fn evaluate_on_pow2_domain(coeffs: &[F], k_log2: u32) -> Vec<F> {
    let n = 1usize << k_log2;
    let mut buf = vec![F::zero(); n];
    let m = coeffs.len().min(n);
    buf[..m].copy_from_slice(&coeffs[..m]);
    forward_ntt_in_place(&mut buf);
    buf
}

/// Interpolate coefficients from evaluations on a `2^k` domain.
#[must_use]
pub fn interpolate_from_evals(evals: &[F]) -> Vec<F> {
    let mut buf = evals.to_vec();
    inverse_ntt_in_place(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow2_domain;
    use crate::poly::eval_horner;

    #[test]
    fn matches_naive_evaluation() {
        let coeffs: Vec<F> = (1..=8u64).map(F::from_u64).collect();
        let evals = evaluate_on_pow2_domain(&coeffs, 3);
        let d = pow2_domain(3);
        for (i, e) in evals.iter().enumerate() {
            assert_eq!(*e, eval_horner(&coeffs, d.element(i)));
        }
    }

    #[test]
    fn size_one_is_identity() {
        let mut a = vec![F::from_u64(42)];
        forward_ntt_in_place(&mut a);
        inverse_ntt_in_place(&mut a);
        assert_eq!(a[0].as_u64(), 42);
    }
}
