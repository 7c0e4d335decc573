//! Trace domain `⟨g⟩` and LDE coset `D = shift · ⟨ω⟩` of one proof.
//!
//! `|⟨g⟩| = n`, `|D| = N = n · 2^log_blowup` and `ω^(2^log_blowup) = g`, so
//! LDE row `i + 2^log_blowup` is the "next row" of LDE row `i`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use zkv_ffts::coset::{coset_from_pow2, CosetDomain};
use zkv_ffts::{pow2_domain, Goldilocks as F, Pow2Domain};

use crate::params::LDE_SHIFT;

/// Evaluation domains derived from a key's sizes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarkDomain {
    /// Trace subgroup `⟨g⟩`.
    pub trace: Pow2Domain,
    /// LDE coset `shift · ⟨ω⟩`.
    pub lde: CosetDomain,
    /// `log2(N / n)`.
    pub log_blowup: u32,
}

impl StarkDomain {
    /// Build the domains. Callers validate the sizes first.
    #[must_use]
    pub fn new(log_trace_len: u32, log_blowup: u32) -> Self {
        Self {
            trace: pow2_domain(log_trace_len),
            lde: coset_from_pow2(pow2_domain(log_trace_len + log_blowup), LDE_SHIFT),
            log_blowup,
        }
    }

    /// `n`.
    #[must_use]
    pub const fn trace_len(&self) -> usize {
        self.trace.size
    }

    /// `N`.
    #[must_use]
    pub const fn lde_len(&self) -> usize {
        self.lde.base.size
    }

    /// `log2(N)`.
    #[must_use]
    pub const fn log_lde_len(&self) -> u32 {
        self.lde.base.log_size
    }

    /// `N / n`.
    #[must_use]
    pub const fn blowup(&self) -> usize {
        1usize << self.log_blowup
    }

    /// Trace generator `g`.
    #[must_use]
    pub const fn trace_gen(&self) -> F {
        self.trace.gen
    }

    /// `g^row`.
    #[must_use]
    pub fn row_point(&self, row: u64) -> F {
        self.trace.gen.pow(row)
    }

    /// `x_i = shift · ω^i`.
    #[must_use]
    pub fn lde_point(&self, i: usize) -> F {
        self.lde.element(i)
    }

    /// LDE row holding the trace row after LDE row `i`.
    #[must_use]
    pub const fn next_lde_row(&self, i: usize) -> usize {
        (i + self.blowup()) % self.lde_len()
    }

    /// The two LDE positions folded together by the first FRI round for a
    /// query at `index`: `(p, p + N/2)` with `p = index mod N/2`.
    #[must_use]
    pub const fn query_pair(&self, index: usize) -> [usize; 2] {
        let half = self.lde_len() / 2;
        let p = index % half;
        [p, p + half]
    }

    /// Whether `x` lies in the trace subgroup or the LDE coset, where the
    /// composition and DEEP quotients are undefined.
    #[must_use]
    pub fn is_excluded_point(&self, x: F) -> bool {
        self.trace.vanishing_at(x).is_zero() || self.lde.contains(x)
    }
}
