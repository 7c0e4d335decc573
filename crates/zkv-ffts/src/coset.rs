//! Multiplicative cosets of power-of-two subgroups and coset LDE helpers.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use crate::ntt::{forward_ntt_in_place, inverse_ntt_in_place};
use crate::{domain::Pow2Domain, pow2_domain, Goldilocks as F, GENERATOR};

/// A multiplicative coset `C = shift · ⟨gen⟩` of a `2^k` subgroup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CosetDomain {
    /// Base `2^k` subgroup domain.
    pub base: Pow2Domain,
    /// Coset representative; must lie outside the base subgroup.
    pub shift: F,
}

impl CosetDomain {
    /// Number of elements in the coset (same as base).
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.base.size
    }

    /// `log2` of the size.
    #[inline]
    #[must_use]
    pub fn log_size(&self) -> u32 {
        self.base.log_size
    }

    /// `i`-th element: `shift * gen^i`.
    #[inline]
    #[must_use]
    pub fn element(&self, i: usize) -> F {
        self.shift * self.base.element(i)
    }

    /// Whether `x` lies in the coset, i.e. `(x / shift)^size == 1`.
    #[must_use]
    pub fn contains(&self, x: F) -> bool {
        self.shift
            .try_inv()
            .is_some_and(|s_inv| (x * s_inv).pow(self.size() as u64) == F::one())
    }

    /// The coset obtained by squaring every element: `shift² · ⟨gen²⟩`.
    ///
    /// Returns `None` for a size-1 coset.
    #[must_use]
    pub fn squared(&self) -> Option<Self> {
        let k = self.base.log_size.checked_sub(1)?;
        Some(Self {
            base: pow2_domain(k),
            shift: self.shift.square(),
        })
    }
}

/// Build a coset from a base domain and an explicit shift.
#[inline]
#[must_use]
pub const fn coset_from_pow2(base: Pow2Domain, shift: F) -> CosetDomain {
    CosetDomain { base, shift }
}

/// Coset of `base` shifted by the field generator `7`, which lies outside
/// every 2-power subgroup.
#[inline]
#[must_use]
pub const fn default_coset(base: Pow2Domain) -> CosetDomain {
    CosetDomain {
        base,
        shift: GENERATOR,
    }
}

/* ------------------------ Coset LDE helper functions ------------------------ */

/// Evaluate a polynomial (given by coefficients) on `shift · ⟨ω_k⟩`.
///
/// `f(shift·x)` at subgroup points equals the NTT of `coeff_j · shift^j`.
/// Inputs longer than `2^k` are truncated.
#[must_use]
pub fn evaluate_on_coset_pow2(coeffs: &[F], k_log2: u32, shift: F) -> Vec<F> {
    let n = 1usize << k_log2;
    let mut scaled = vec![F::zero(); n];
    let mut pow = F::one();
    for (dst, c) in scaled.iter_mut().zip(coeffs) {
        *dst = *c * pow;
        pow *= shift;
    }
    forward_ntt_in_place(&mut scaled);
    scaled
}

/// Interpolate coefficients from evaluations on `shift · ⟨ω_k⟩`
/// (`k = log2(evals.len())`).
///
/// Returns `None` if `shift` is zero.
///
/// # Panics
/// Panics if `evals.len()` is not a power of two.
#[must_use]
pub fn interpolate_on_coset_pow2(evals: &[F], shift: F) -> Option<Vec<F>> {
    let s_inv = shift.try_inv()?;
    let mut coeffs = evals.to_vec();
    inverse_ntt_in_place(&mut coeffs);
    let mut pow = F::one();
    for c in &mut coeffs {
        *c *= pow;
        pow *= s_inv;
    }
    Some(coeffs)
}
