//! Evaluation-domain helpers for the Goldilocks field.
//!
//! Size-`2^k` multiplicative subgroups use the cached roots `ω_k` from
//! [`crate::roots`], which have exact order `2^k` (two-adicity 32).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use crate::{roots, Goldilocks as F, TWO_ADICITY};

/// A power-of-two multiplicative subgroup domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pow2Domain {
    /// Domain size (`2^k`).
    pub size: usize,
    /// `k = log2(size)`.
    pub log_size: u32,
    /// A generator of the size-`size` subgroup.
    pub gen: F,
}

impl Pow2Domain {
    /// Return the `i`-th element: `gen^i`.
    #[inline]
    #[must_use]
    pub fn element(&self, i: usize) -> F {
        self.gen.pow((i % self.size) as u64)
    }

    /// Inverse of the generator.
    #[inline]
    #[must_use]
    pub fn gen_inv(&self) -> F {
        roots::table().inv_root(self.log_size)
    }

    /// All elements in order (`gen^0 .. gen^(size-1)`).
    #[must_use]
    pub fn elements(&self) -> Vec<F> {
        let mut out = Vec::with_capacity(self.size);
        let mut cur = F::one();
        for _ in 0..self.size {
            out.push(cur);
            cur *= self.gen;
        }
        out
    }

    /// Evaluate the vanishing polynomial `x^size - 1` at `x`.
    #[inline]
    #[must_use]
    pub fn vanishing_at(&self, x: F) -> F {
        x.pow(self.size as u64) - F::one()
    }
}

/// Compute a `2^k` domain for Goldilocks. `0 <= k <= 32`.
///
/// # Panics
/// Panics if `k > 32`.
#[must_use]
pub fn pow2_domain(k: u32) -> Pow2Domain {
    assert!(k <= TWO_ADICITY, "k must be in 0..=32 for Goldilocks");
    let gen = roots::table().root(k);

    debug_assert_eq!(gen.pow(1u64 << k), F::one(), "ω^(2^k) should be 1");
    if k > 0 {
        debug_assert_ne!(
            gen.pow(1u64 << (k - 1)),
            F::one(),
            "ω should have exact order 2^k"
        );
    }

    Pow2Domain {
        size: 1usize << k,
        log_size: k,
        gen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_cycle() {
        let d = pow2_domain(4);
        let els = d.elements();
        assert_eq!(els.len(), 16);
        assert_eq!(els[0], F::one());
        assert_eq!(d.element(16), F::one());
        assert_eq!(d.element(3), els[3]);
        assert_eq!(d.gen * d.gen_inv(), F::one());
        for x in els {
            assert_eq!(d.vanishing_at(x), F::zero());
        }
    }
}
