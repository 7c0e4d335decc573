//! STARK verifier: transcript replay, OOD check, openings and FRI.
//!
//! Steps run in a fixed order and the first failure is returned. Only the
//! per-query checks fan out (rayon, `parallel` feature); their results are
//! gathered in query order and reduced to the first error, so the outcome
//! does not depend on scheduling.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};
use zkv_ffts::Goldilocks as F;
use zkv_merkle::{hash_leaf, verify_open, Digest};

use crate::air::Frame;
use crate::composition::{combine_columns, composition_at};
use crate::deep::{deep_value, DeepRow};
use crate::domain::StarkDomain;
use crate::error::{RejectKind, VerifyError, VerifyResult};
use crate::fri::FriVerifier;
use crate::params;
use crate::proof::{QueryOpening, RowOpening, StarkProof};
use crate::protocol::{self, ConstraintCoeffs, DeepCoeffs};
use crate::vk::VerificationKey;

/// Runtime knobs of one verification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Check queries in parallel (ignored without the `parallel` feature).
    pub parallel: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Verify `proof` against `vk` with default options.
///
/// # Errors
/// The first failed check, in protocol order.
pub fn verify(proof: &StarkProof, vk: &VerificationKey) -> VerifyResult<()> {
    verify_with(proof, vk, VerifyOptions::default())
}

/// Verify with explicit options.
///
/// # Errors
/// The first failed check, in protocol order.
pub fn verify_with(proof: &StarkProof, vk: &VerificationKey, opts: VerifyOptions) -> VerifyResult<()> {
    let res = run(proof, vk, opts);
    if let Err(e) = &res {
        if e.kind() == RejectKind::Domain {
            warn!(error = %e, "verifier hit an arithmetic domain error");
        } else {
            debug!(kind = %e.kind(), error = %e, "proof rejected");
        }
    }
    res
}

fn run(proof: &StarkProof, vk: &VerificationKey, opts: VerifyOptions) -> VerifyResult<()> {
    vk.validate()?;
    check_shape(proof, vk)?;

    let domain = StarkDomain::new(vk.log_trace_len, vk.fri.log_blowup);
    let air = &vk.air;
    let mut tr = protocol::new_transcript();

    protocol::absorb_statement(&mut tr, vk, &proof.public_inputs);
    let coeffs = ConstraintCoeffs::draw(&mut tr, &proof.trace_root, air);
    let z = protocol::draw_ood_point(&mut tr, &proof.composition_root, &domain);
    debug!(log_trace_len = vk.log_trace_len, log_blowup = vk.fri.log_blowup, "transcript bound");

    // OOD composition identity.
    let ood = &proof.ood;
    let frame = Frame {
        trace: &ood.trace_z,
        trace_next: &ood.trace_gz,
        fixed: &ood.fixed_z,
        fixed_next: &ood.fixed_gz,
    };
    let expected = composition_at(air, &coeffs, &proof.public_inputs, &domain, z, &frame)
        .ok_or(VerifyError::DivisionByZero("evaluating the composition at z"))?;
    if combine_columns(&ood.composition_z, z, domain.trace_len()) != expected {
        return Err(VerifyError::OodMismatch);
    }
    debug!("OOD composition identity holds");

    let deep = DeepCoeffs::draw(
        &mut tr,
        ood,
        vk.trace_width as usize,
        vk.fixed_width as usize,
        vk.composition_width(),
    );
    let fri = FriVerifier::new(
        &mut tr,
        &domain.lde,
        vk.num_folds() as usize,
        vk.fri.log_remainder_len,
        &proof.fri,
    )?;
    let indices = protocol::draw_query_indices(&mut tr, vk.fri.num_queries as usize, domain.lde_len());

    let ctx = QueryContext {
        vk,
        proof,
        domain: &domain,
        deep: &deep,
        fri: &fri,
        z,
        gz: z * domain.trace_gen(),
    };
    check_queries(&ctx, &indices, opts)?;
    debug!(queries = indices.len(), "all queries passed");
    Ok(())
}

/// Widths and counts the proof must have for this key.
fn check_shape(proof: &StarkProof, vk: &VerificationKey) -> VerifyResult<()> {
    let tw = vk.trace_width as usize;
    let fw = vk.fixed_width as usize;
    let m = vk.composition_width();

    if proof.public_inputs.len() != vk.air.num_public as usize {
        return Err(VerifyError::shape(format!(
            "{} public inputs, key expects {}",
            proof.public_inputs.len(),
            vk.air.num_public
        )));
    }
    let ood = &proof.ood;
    for (name, got, want) in [
        ("trace_z", ood.trace_z.len(), tw),
        ("trace_gz", ood.trace_gz.len(), tw),
        ("fixed_z", ood.fixed_z.len(), fw),
        ("fixed_gz", ood.fixed_gz.len(), fw),
        ("composition_z", ood.composition_z.len(), m),
    ] {
        if got != want {
            return Err(VerifyError::shape(format!("OOD {name} has {got} values, expected {want}")));
        }
    }
    if proof.queries.len() != vk.fri.num_queries as usize {
        return Err(VerifyError::shape(format!(
            "{} query openings, expected {}",
            proof.queries.len(),
            vk.fri.num_queries
        )));
    }
    for (q, opening) in proof.queries.iter().enumerate() {
        for (name, rows, want) in [
            ("trace", &opening.trace, tw),
            ("fixed", &opening.fixed, fw),
            ("composition", &opening.composition, m),
        ] {
            if rows.iter().any(|r| r.values.len() != want) {
                return Err(VerifyError::shape(format!(
                    "query {q}: {name} row width differs from {want}"
                )));
            }
        }
    }
    Ok(())
}

struct QueryContext<'a> {
    vk: &'a VerificationKey,
    proof: &'a StarkProof,
    domain: &'a StarkDomain,
    deep: &'a DeepCoeffs,
    fri: &'a FriVerifier<'a>,
    z: F,
    gz: F,
}

fn check_queries(ctx: &QueryContext<'_>, indices: &[usize], opts: VerifyOptions) -> VerifyResult<()> {
    let jobs: Vec<(usize, usize, &QueryOpening)> = indices
        .iter()
        .zip(&ctx.proof.queries)
        .enumerate()
        .map(|(q, (i, o))| (q, *i, o))
        .collect();

    #[cfg(feature = "parallel")]
    let results: Vec<VerifyResult<()>> = if opts.parallel {
        jobs.par_iter()
            .map(|(q, i, o)| check_query(ctx, *q, *i, o))
            .collect()
    } else {
        jobs.iter().map(|(q, i, o)| check_query(ctx, *q, *i, o)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let results: Vec<VerifyResult<()>> = {
        let _ = opts;
        jobs.iter().map(|(q, i, o)| check_query(ctx, *q, *i, o)).collect()
    };

    results.into_iter().collect()
}

fn check_query(ctx: &QueryContext<'_>, query: usize, index: usize, opening: &QueryOpening) -> VerifyResult<()> {
    let domain = ctx.domain;
    if index >= domain.lde_len() {
        return Err(VerifyError::IndexOutOfDomain {
            index,
            size: domain.lde_len(),
        });
    }
    let positions = domain.query_pair(index);
    let depth = domain.log_lde_len() as usize;

    for (j, pos) in positions.iter().enumerate() {
        check_row(&ctx.proof.trace_root, params::LEAF_TRACE, *pos, &opening.trace[j], depth)?;
        check_row(&ctx.vk.fixed_root, params::LEAF_FIXED, *pos, &opening.fixed[j], depth)?;
        check_row(
            &ctx.proof.composition_root,
            params::LEAF_COMPOSITION,
            *pos,
            &opening.composition[j],
            depth,
        )?;
    }

    let mut pair = [F::zero(); 2];
    for (j, pos) in positions.iter().enumerate() {
        let row = DeepRow {
            trace: &opening.trace[j].values,
            fixed: &opening.fixed[j].values,
            composition: &opening.composition[j].values,
        };
        pair[j] = deep_value(ctx.deep, &ctx.proof.ood, ctx.z, ctx.gz, domain.lde_point(*pos), &row)
            .ok_or(VerifyError::DivisionByZero("evaluating the DEEP quotient"))?;
    }

    ctx.fri.verify_query(query, index, pair, &opening.fri_layers)
}

fn check_row(root: &Digest, label: &'static str, index: usize, row: &RowOpening, depth: usize) -> VerifyResult<()> {
    let elems: Vec<[u8; 8]> = row.values.iter().map(|v| v.to_le_bytes()).collect();
    let leaf = hash_leaf(label, &elems);
    match verify_open(root, index, &leaf, &row.path, depth) {
        Ok(true) => Ok(()),
        Ok(false) => Err(VerifyError::CommitmentMismatch { what: label, index }),
        Err(source) => Err(VerifyError::MerklePath { what: label, source }),
    }
}
