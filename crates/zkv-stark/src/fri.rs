//! FRI low-degree test, folding factor 2.
//!
//! Layer `r` lives on the coset `shift^(2^r) · ⟨ω^(2^r)⟩` of size `N >> r`.
//! With `h` the half size, the pair `(v[i], v[i+h])` folds to
//!
//! ```text
//! v'[i] = (lo + hi)/2 + β · (lo − hi)/(2x),   x = shift^(2^r) · ω^(2^r · i)
//! ```
//!
//! Layer 0 is never committed (the verifier rebuilds its pairs from the DEEP
//! composition), layers `1..R` are committed as pair leaves
//! `[v[k], v[k + h]]`, and the terminal layer `R` is replaced by the
//! remainder polynomial sent in the clear.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use zkv_crypto::Transcript;
use zkv_ffts::coset::CosetDomain;
use zkv_ffts::poly::eval_horner;
use zkv_ffts::Goldilocks as F;
use zkv_merkle::{hash_leaf, verify_open, Digest};

use crate::error::{VerifyError, VerifyResult};
use crate::params;
use crate::proof::{FriLayerOpening, FriProof};

/// `1/2` in the field.
const TWO_INV: F = F::from_u64((zkv_ffts::GOLDILOCKS + 1) / 2);

/// Fold one pair at layer point `x`. `None` if `x == 0`.
#[inline]
#[must_use]
pub fn fold_pair(lo: F, hi: F, beta: F, x: F) -> Option<F> {
    let inv_two_x = (x + x).try_inv()?;
    Some((lo + hi) * TWO_INV + beta * (lo - hi) * inv_two_x)
}

/// Fold a whole layer living on `coset`. `None` if the layer length does
/// not match the coset or a point is zero.
#[must_use]
pub fn fold_layer(values: &[F], beta: F, coset: &CosetDomain) -> Option<Vec<F>> {
    if values.len() != coset.size() || values.len() < 2 {
        return None;
    }
    let half = values.len() / 2;
    let (lo, hi) = values.split_at(half);
    let mut x = coset.shift;
    let step = coset.base.gen;
    lo.iter()
        .zip(hi)
        .map(|(l, h)| {
            let out = fold_pair(*l, *h, beta, x);
            x *= step;
            out
        })
        .collect()
}

/// Leaf hash of a committed layer pair.
#[must_use]
pub fn pair_leaf(pair: &[F; 2]) -> Digest {
    hash_leaf(params::LEAF_FRI, &[pair[0].to_le_bytes(), pair[1].to_le_bytes()])
}

/// Cosets of layers `0..=R`.
#[must_use]
pub fn layer_cosets(lde: &CosetDomain, num_folds: usize) -> Vec<CosetDomain> {
    let mut out = Vec::with_capacity(num_folds + 1);
    let mut cur = Some(lde.clone());
    while let Some(c) = cur.take() {
        if out.len() == num_folds {
            out.push(c);
            break;
        }
        cur = c.squared();
        out.push(c);
    }
    out
}

/// Commit-phase replay plus per-query checks.
#[derive(Debug)]
pub struct FriVerifier<'a> {
    proof: &'a FriProof,
    betas: Vec<F>,
    layers: Vec<CosetDomain>,
}

impl<'a> FriVerifier<'a> {
    /// Replay the commit phase: draw `β_r`, absorb the root of layer `r+1`
    /// while it is committed, then absorb the remainder.
    ///
    /// # Errors
    /// Structural if the number of roots is not `R - 1`; degree-bound if the
    /// remainder has more than `2^log_remainder_len` coefficients.
    pub fn new<T: Transcript>(
        tr: &mut T,
        lde: &CosetDomain,
        num_folds: usize,
        log_remainder_len: u32,
        proof: &'a FriProof,
    ) -> VerifyResult<Self> {
        let expected_roots = num_folds.saturating_sub(1);
        if num_folds == 0 || proof.layer_roots.len() != expected_roots {
            return Err(VerifyError::shape(format!(
                "FRI has {} layer roots, expected {expected_roots}",
                proof.layer_roots.len()
            )));
        }
        let layers = layer_cosets(lde, num_folds);
        if layers.len() != num_folds + 1 {
            return Err(VerifyError::shape(format!(
                "{num_folds} FRI folds exceed an LDE of size {}",
                lde.size()
            )));
        }

        let mut betas = Vec::with_capacity(num_folds);
        for r in 0..num_folds {
            betas.push(tr.challenge_field_element(params::DS_FRI_BETA));
            if r + 1 < num_folds {
                tr.absorb(params::DS_FRI_LAYER_ROOT, &proof.layer_roots[r]);
            }
        }

        let max = 1usize << log_remainder_len;
        if proof.remainder.len() > max {
            return Err(VerifyError::RemainderDegree {
                len: proof.remainder.len(),
                max,
            });
        }
        tr.absorb_u64(params::DS_FRI_REMAINDER_LEN, proof.remainder.len() as u64);
        tr.absorb_field_elements(params::DS_FRI_REMAINDER, &proof.remainder);

        Ok(Self {
            proof,
            betas,
            layers,
        })
    }

    /// Folding challenges, one per round.
    #[must_use]
    pub fn betas(&self) -> &[F] {
        &self.betas
    }

    /// Check one query at LDE `index` given the recomputed layer-0 pair
    /// `(v[p], v[p + N/2])` and the openings of layers `1..R`.
    ///
    /// # Errors
    /// The first failing check along the query's folding path.
    pub fn verify_query(
        &self,
        query: usize,
        index: usize,
        layer0: [F; 2],
        openings: &[FriLayerOpening],
    ) -> VerifyResult<()> {
        let num_folds = self.betas.len();
        if openings.len() != num_folds - 1 {
            return Err(VerifyError::shape(format!(
                "query {query} opens {} FRI layers, expected {}",
                openings.len(),
                num_folds - 1
            )));
        }
        let lde_len = self.layers[0].size();
        if index >= lde_len {
            return Err(VerifyError::IndexOutOfDomain {
                index,
                size: lde_len,
            });
        }

        let mut pos = index % (lde_len / 2);
        let mut folded = fold_pair(layer0[0], layer0[1], self.betas[0], self.layers[0].element(pos))
            .ok_or(VerifyError::DivisionByZero("folding FRI layer 0"))?;

        for (r, opening) in (1..num_folds).zip(openings) {
            let coset = &self.layers[r];
            let half = coset.size() / 2;
            let leaf_index = pos % half;
            let depth = half.trailing_zeros() as usize;

            let ok = verify_open(
                &self.proof.layer_roots[r - 1],
                leaf_index,
                &pair_leaf(&opening.pair),
                &opening.path,
                depth,
            )
            .map_err(|source| VerifyError::MerklePath {
                what: "FRI layer",
                source,
            })?;
            if !ok {
                return Err(VerifyError::CommitmentMismatch {
                    what: "FRI layer",
                    index: leaf_index,
                });
            }

            let opened = opening.pair[usize::from(pos >= half)];
            if opened != folded {
                return Err(VerifyError::FriFold { query, layer: r });
            }

            folded = fold_pair(
                opening.pair[0],
                opening.pair[1],
                self.betas[r],
                coset.element(leaf_index),
            )
            .ok_or(VerifyError::DivisionByZero("folding FRI layer"))?;
            pos = leaf_index;
        }

        let terminal = &self.layers[num_folds];
        let expected = eval_horner(&self.proof.remainder, terminal.element(pos));
        if expected != folded {
            return Err(VerifyError::FriRemainder { query });
        }
        Ok(())
    }
}
