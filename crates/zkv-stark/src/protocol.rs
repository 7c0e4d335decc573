//! Transcript steps shared by the verifier and the fixture prover.
//!
//! Order: statement (`vk_digest`, `fixed_root`, `n_public`, `public`) →
//! `trace_root` → `constraint_coeffs` → `composition_root` → `ood_point` →
//! `ood_frame` → `deep_coeffs` → FRI commit phase → `query_indices`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use zkv_crypto::{Blake3Transcript, Transcript};
use zkv_ffts::Goldilocks as F;
use zkv_merkle::Digest;

use crate::air::Air;
use crate::domain::StarkDomain;
use crate::params;
use crate::proof::OodFrame;
use crate::vk::VerificationKey;

/// Fresh protocol transcript.
#[must_use]
pub fn new_transcript() -> Blake3Transcript {
    Blake3Transcript::new(params::DOMAIN_SEP)
}

/// Bind the key and the public inputs.
pub fn absorb_statement<T: Transcript>(tr: &mut T, vk: &VerificationKey, public: &[F]) {
    tr.absorb(params::DS_VK_DIGEST, &vk.digest());
    tr.absorb(params::DS_FIXED_ROOT, &vk.fixed_root);
    tr.absorb_u64(params::DS_N_PUBLIC, public.len() as u64);
    tr.absorb_field_elements(params::DS_PUBLIC, public);
}

/// Random coefficients of the constraint composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintCoeffs {
    /// One per transition constraint.
    pub transition: Vec<F>,
    /// One per boundary constraint.
    pub boundary: Vec<F>,
}

impl ConstraintCoeffs {
    /// Absorb the trace root and draw the coefficients.
    pub fn draw<T: Transcript>(tr: &mut T, trace_root: &Digest, air: &Air) -> Self {
        tr.absorb(params::DS_TRACE_ROOT, trace_root);
        let mut all = tr.challenge_field_elements(params::DS_CONSTRAINT_COEFFS, air.num_constraints());
        let boundary = all.split_off(air.transitions.len());
        Self {
            transition: all,
            boundary,
        }
    }
}

/// Absorb the composition root and draw the OOD point `z`.
///
/// `z` is nudged by `+1` until it lies outside both the trace subgroup and
/// the LDE coset.
pub fn draw_ood_point<T: Transcript>(tr: &mut T, composition_root: &Digest, domain: &StarkDomain) -> F {
    tr.absorb(params::DS_COMPOSITION_ROOT, composition_root);
    let mut z = tr.challenge_field_element(params::DS_OOD_POINT);
    while domain.is_excluded_point(z) {
        z += F::one();
    }
    z
}

/// DEEP coefficients, split by what they weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepCoeffs {
    /// Trace quotients at `z`.
    pub trace_z: Vec<F>,
    /// Trace quotients at `g·z`.
    pub trace_gz: Vec<F>,
    /// Fixed quotients at `z`.
    pub fixed_z: Vec<F>,
    /// Fixed quotients at `g·z`.
    pub fixed_gz: Vec<F>,
    /// Composition quotients at `z`.
    pub composition: Vec<F>,
}

impl DeepCoeffs {
    /// Absorb the OOD frame and draw `2·tw + 2·fw + m` coefficients.
    pub fn draw<T: Transcript>(tr: &mut T, ood: &OodFrame, trace_width: usize, fixed_width: usize, comp_width: usize) -> Self {
        tr.absorb_field_elements(params::DS_OOD_FRAME, &ood.flatten());
        let total = 2 * trace_width + 2 * fixed_width + comp_width;
        let all = tr.challenge_field_elements(params::DS_DEEP_COEFFS, total);
        let mut it = all.into_iter();
        let mut take = |k: usize| -> Vec<F> { it.by_ref().take(k).collect() };
        Self {
            trace_z: take(trace_width),
            trace_gz: take(trace_width),
            fixed_z: take(fixed_width),
            fixed_gz: take(fixed_width),
            composition: take(comp_width),
        }
    }
}

/// Draw the query positions on the LDE domain.
pub fn draw_query_indices<T: Transcript>(tr: &mut T, num_queries: usize, lde_len: usize) -> Vec<usize> {
    tr.challenge_indices(params::DS_QUERY_INDICES, num_queries, lde_len)
}
