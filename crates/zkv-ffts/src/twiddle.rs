//! Twiddle-factor helpers for power-of-two NTT over Goldilocks.
//!
//! Stage `s` of a radix-2 transform uses powers of the primitive `2^s` root.
//! Forward and inverse tables differ only in which root is expanded.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use crate::domain::Pow2Domain;
use crate::{roots, Goldilocks as F};

/// Compute stage twiddles for a length-`n` NTT with primitive `n`-th root.
///
/// Returns a vector of length `n/2` where entry `j` is `gen^j`.
#[inline]
#[must_use]
pub fn stage_twiddles(dom: &Pow2Domain) -> Vec<F> {
    powers(dom.gen, dom.size / 2)
}

/// Per-stage twiddles for a full transform of size `2^n_log2`.
///
/// Entry `s - 1` holds the `2^(s-1)` powers of `ω_s` (or `ω_s^{-1}` when
/// `inverse` is set).
#[must_use]
pub fn all_stage_twiddles(n_log2: u32, inverse: bool) -> Vec<Vec<F>> {
    let table = roots::table();
    (1..=n_log2)
        .map(|s| {
            let w = if inverse {
                table.inv_root(s)
            } else {
                table.root(s)
            };
            powers(w, 1usize << (s - 1))
        })
        .collect()
}

#[inline]
fn powers(base: F, count: usize) -> Vec<F> {
    let mut tw = Vec::with_capacity(count);
    let mut cur = F::one();
    for _ in 0..count {
        tw.push(cur);
        cur *= base;
    }
    tw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow2_domain;

    #[test]
    fn last_stage_matches_domain() {
        let d = pow2_domain(5);
        let all = all_stage_twiddles(5, false);
        assert_eq!(all.len(), 5);
        assert_eq!(all[4], stage_twiddles(&d));
        let inv = all_stage_twiddles(5, true);
        for (a, b) in all[4].iter().zip(&inv[4]) {
            assert_eq!(*a * *b, F::one());
        }
    }
}
