//! Precomputed 2-adic roots of unity for Goldilocks.
//!
//! `ω_k = g^((p-1)/2^k)` with `g = 7`, for every `k` in `0..=32`, together
//! with the inverses. The table is built once behind a [`OnceLock`]; calling
//! [`init`] more than once is harmless.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use std::sync::OnceLock;

use crate::{Goldilocks as F, GENERATOR, GOLDILOCKS, TWO_ADICITY};

const TABLE_LEN: usize = TWO_ADICITY as usize + 1;

/// Roots `ω_k` and their inverses, indexed by `k`.
#[derive(Debug)]
pub struct RootTable {
    roots: [F; TABLE_LEN],
    inv_roots: [F; TABLE_LEN],
}

impl RootTable {
    fn build() -> Self {
        let mut roots = [F::one(); TABLE_LEN];
        let mut inv_roots = [F::one(); TABLE_LEN];

        // Start from the 2^32-th root and square down.
        let top = GENERATOR.pow((GOLDILOCKS - 1) >> TWO_ADICITY);
        let mut w = top;
        for k in (0..TABLE_LEN).rev() {
            roots[k] = w;
            inv_roots[k] = w.inv();
            w = w.square();
        }
        Self { roots, inv_roots }
    }

    /// Primitive `2^k` root of unity.
    ///
    /// # Panics
    /// Panics if `k > 32`.
    #[inline]
    #[must_use]
    pub fn root(&self, k: u32) -> F {
        self.roots[k as usize]
    }

    /// Inverse of [`Self::root`].
    ///
    /// # Panics
    /// Panics if `k > 32`.
    #[inline]
    #[must_use]
    pub fn inv_root(&self, k: u32) -> F {
        self.inv_roots[k as usize]
    }
}

static TABLE: OnceLock<RootTable> = OnceLock::new();

/// Shared root table, built on first use.
#[inline]
pub fn table() -> &'static RootTable {
    TABLE.get_or_init(RootTable::build)
}

/// Idempotent eager initialization of the root table.
pub fn init() {
    let _ = table();
}

/// Primitive `2^k` root of unity, or `None` when `k` exceeds the two-adicity.
#[inline]
#[must_use]
pub fn root_2exp(k: u32) -> Option<F> {
    (k <= TWO_ADICITY).then(|| table().root(k))
}
