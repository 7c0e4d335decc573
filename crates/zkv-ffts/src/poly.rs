//! Dense univariate polynomial helpers (coefficient form, low degree first).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use crate::Goldilocks as F;

/// Evaluate `Σ coeffs[j]·x^j` by Horner's rule.
#[inline]
#[must_use]
pub fn eval_horner(coeffs: &[F], x: F) -> F {
    coeffs.iter().rev().fold(F::zero(), |acc, c| acc * x + *c)
}

/// Degree ignoring trailing zero coefficients; `None` for the zero polynomial.
#[must_use]
pub fn degree(coeffs: &[F]) -> Option<usize> {
    coeffs.iter().rposition(|c| !c.is_zero())
}

/// Invert every element with one field inversion (Montgomery's trick).
///
/// Returns `None` if any input is zero.
#[must_use]
pub fn batch_inverse(xs: &[F]) -> Option<Vec<F>> {
    if xs.is_empty() {
        return Some(Vec::new());
    }
    let mut prefix = Vec::with_capacity(xs.len());
    let mut acc = F::one();
    for x in xs {
        if x.is_zero() {
            return None;
        }
        prefix.push(acc);
        acc *= *x;
    }

    let mut inv = acc.try_inv()?;
    let mut out = vec![F::zero(); xs.len()];
    for i in (0..xs.len()).rev() {
        out[i] = inv * prefix[i];
        inv *= xs[i];
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horner_small() {
        // 3 + 2x + x^2 at x = 5
        let p = [F::from_u64(3), F::from_u64(2), F::from_u64(1)];
        assert_eq!(eval_horner(&p, F::from_u64(5)).as_u64(), 38);
        assert_eq!(eval_horner(&[], F::from_u64(5)), F::zero());
    }

    #[test]
    fn degree_skips_trailing_zeros() {
        let p = [F::one(), F::zero(), F::from_u64(4), F::zero(), F::zero()];
        assert_eq!(degree(&p), Some(2));
        assert_eq!(degree(&[F::zero(); 3]), None);
        assert_eq!(degree(&[]), None);
    }

    #[test]
    fn batch_inverse_matches_single() {
        let xs: Vec<F> = (1..20u64).map(|v| F::from_u64(v * 7919)).collect();
        let inv = batch_inverse(&xs).unwrap();
        for (x, xi) in xs.iter().zip(&inv) {
            assert_eq!(*x * *xi, F::one());
        }
        assert!(batch_inverse(&[F::one(), F::zero()]).is_none());
    }
}
