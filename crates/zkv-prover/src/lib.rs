//! Reference prover producing fixture proofs for the zkv verifier.
//!
//! This is test tooling: it commits full LDEs in memory, has no
//! zero-knowledge masking and is only as fast as it needs to be for small
//! traces. It follows the same transcript schedule as the verifier by
//! calling the shared [`zkv_stark::protocol`], composition, DEEP and FRI
//! folding functions.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::cast_possible_truncation, clippy::module_name_repetitions)]

pub mod fixtures;

use anyhow::{bail, ensure, Context, Result};
use tracing::debug;
use zkv_crypto::Transcript;
use zkv_ffts::coset::{evaluate_on_coset_pow2, interpolate_on_coset_pow2};
use zkv_ffts::ntt::interpolate_from_evals;
use zkv_ffts::poly::{degree, eval_horner};
use zkv_ffts::Goldilocks as F;
use zkv_merkle::MerkleTree;
use zkv_stark::air::{Air, Frame};
use zkv_stark::composition::composition_at;
use zkv_stark::deep::{deep_value, DeepRow};
use zkv_stark::domain::StarkDomain;
use zkv_stark::fri::{fold_layer, layer_cosets};
use zkv_stark::params;
use zkv_stark::proof::{FriLayerOpening, FriProof, OodFrame, QueryOpening, RowOpening, StarkProof};
use zkv_stark::protocol::{self, ConstraintCoeffs, DeepCoeffs};
use zkv_stark::vk::{FieldId, FriOptions, HashId, VerificationKey};

/* ------------------------------ Column commits ----------------------------- */

/// Columns in coefficient form, their LDE and the Merkle tree over LDE rows.
#[derive(Clone, Debug)]
struct CommittedColumns {
    coeffs: Vec<Vec<F>>,
    lde: Vec<Vec<F>>,
    tree: MerkleTree,
}

impl CommittedColumns {
    fn commit(label: &str, coeffs: Vec<Vec<F>>, domain: &StarkDomain) -> Result<Self> {
        let log_n = domain.log_lde_len();
        let shift = domain.lde.shift;
        let lde: Vec<Vec<F>> = coeffs
            .iter()
            .map(|c| evaluate_on_coset_pow2(c, log_n, shift))
            .collect();
        let rows: Vec<Vec<[u8; 8]>> = (0..domain.lde_len())
            .map(|i| lde.iter().map(|col| col[i].to_le_bytes()).collect())
            .collect();
        let tree = MerkleTree::from_rows(label, &rows)
            .with_context(|| format!("committing {label} columns"))?;
        Ok(Self { coeffs, lde, tree })
    }

    fn row(&self, i: usize) -> Vec<F> {
        self.lde.iter().map(|col| col[i]).collect()
    }

    fn eval_at(&self, x: F) -> Vec<F> {
        self.coeffs.iter().map(|c| eval_horner(c, x)).collect()
    }

    fn open(&self, i: usize) -> Result<RowOpening> {
        Ok(RowOpening {
            values: self.row(i),
            path: self.tree.open(i)?,
        })
    }
}

/* --------------------------------- Setup ----------------------------------- */

/// Prover-side key: the verification key plus the committed fixed columns.
#[derive(Clone, Debug)]
pub struct ProvingKey {
    vk: VerificationKey,
    domain: StarkDomain,
    fixed_values: Vec<Vec<F>>,
    fixed: CommittedColumns,
}

impl ProvingKey {
    /// The matching verification key.
    #[must_use]
    pub const fn vk(&self) -> &VerificationKey {
        &self.vk
    }
}

/// Commit the fixed columns and build the key pair.
///
/// # Errors
/// If the resulting key violates a protocol limit or a fixed column does not
/// have `2^log_trace_len` values.
pub fn setup(
    air: Air,
    trace_width: u32,
    fixed_columns: Vec<Vec<F>>,
    log_trace_len: u32,
    fri: FriOptions,
) -> Result<(ProvingKey, VerificationKey)> {
    let mut vk = VerificationKey {
        field: FieldId::Goldilocks,
        hash: HashId::Blake3,
        log_trace_len,
        trace_width,
        fixed_width: fixed_columns.len() as u32,
        fixed_root: [0u8; 32],
        air,
        fri,
    };
    vk.validate().context("verification key rejected")?;

    let n = 1usize << log_trace_len;
    ensure!(
        fixed_columns.iter().all(|c| c.len() == n),
        "fixed columns must have {n} rows"
    );
    let domain = StarkDomain::new(log_trace_len, fri.log_blowup);
    let fixed_coeffs = fixed_columns.iter().map(|c| interpolate_from_evals(c)).collect();
    let fixed = CommittedColumns::commit(params::LEAF_FIXED, fixed_coeffs, &domain)?;
    vk.fixed_root = fixed.tree.root();
    debug!(air = %vk.air.name, log_trace_len, "setup complete");

    let pk = ProvingKey {
        vk: vk.clone(),
        domain,
        fixed_values: fixed_columns,
        fixed,
    };
    Ok((pk, vk))
}

/* --------------------------------- Prove ----------------------------------- */

fn check_trace(air: &Air, trace: &[Vec<F>], fixed: &[Vec<F>], public: &[F]) -> Result<()> {
    let n = trace.first().map_or(0, Vec::len);
    let row_of = |cols: &[Vec<F>], r: usize| -> Vec<F> { cols.iter().map(|c| c[r]).collect() };
    for r in 0..n.saturating_sub(1) {
        let (cur, next) = (row_of(trace, r), row_of(trace, r + 1));
        let (fcur, fnext) = (row_of(fixed, r), row_of(fixed, r + 1));
        let frame = Frame {
            trace: &cur,
            trace_next: &next,
            fixed: &fcur,
            fixed_next: &fnext,
        };
        if let Some(t) = air.transitions.iter().position(|c| !c.eval(&frame).is_zero()) {
            bail!("transition constraint {t} fails at row {r}");
        }
    }
    for (b, c) in air.boundaries.iter().enumerate() {
        let target = c.target(public).context("boundary references a missing public input")?;
        let row = c.row.resolve(n as u64) as usize;
        ensure!(
            trace[c.column as usize][row] == target,
            "boundary constraint {b} fails (column {}, row {row})",
            c.column
        );
    }
    Ok(())
}

fn commit_pairs(values: &[F]) -> Result<MerkleTree> {
    let half = values.len() / 2;
    let rows: Vec<Vec<[u8; 8]>> = (0..half)
        .map(|k| vec![values[k].to_le_bytes(), values[k + half].to_le_bytes()])
        .collect();
    Ok(MerkleTree::from_rows(params::LEAF_FRI, &rows)?)
}

/// Prove that `trace` (column-major, `trace_width × n`) satisfies the key's
/// AIR with the given public inputs.
///
/// # Errors
/// If the trace has the wrong shape or violates a constraint.
#[allow(clippy::too_many_lines)]
pub fn prove(pk: &ProvingKey, trace: &[Vec<F>], public_inputs: &[F]) -> Result<StarkProof> {
    let vk = &pk.vk;
    let domain = &pk.domain;
    let n = domain.trace_len();
    let lde_len = domain.lde_len();
    let m = vk.composition_width();

    ensure!(
        trace.len() == vk.trace_width as usize,
        "trace has {} columns, key expects {}",
        trace.len(),
        vk.trace_width
    );
    ensure!(trace.iter().all(|c| c.len() == n), "trace columns must have {n} rows");
    ensure!(
        public_inputs.len() == vk.air.num_public as usize,
        "{} public inputs, AIR expects {}",
        public_inputs.len(),
        vk.air.num_public
    );
    check_trace(&vk.air, trace, &pk.fixed_values, public_inputs)?;

    // Trace commitment.
    let trace_coeffs = trace.iter().map(|c| interpolate_from_evals(c)).collect();
    let tc = CommittedColumns::commit(params::LEAF_TRACE, trace_coeffs, domain)?;

    let mut tr = protocol::new_transcript();
    protocol::absorb_statement(&mut tr, vk, public_inputs);
    let coeffs = ConstraintCoeffs::draw(&mut tr, &tc.tree.root(), &vk.air);

    // Composition on the LDE, then split into `m` columns of degree < n.
    let fc = &pk.fixed;
    let mut h_evals = Vec::with_capacity(lde_len);
    for i in 0..lde_len {
        let j = domain.next_lde_row(i);
        let (cur, next, fcur, fnext) = (tc.row(i), tc.row(j), fc.row(i), fc.row(j));
        let frame = Frame {
            trace: &cur,
            trace_next: &next,
            fixed: &fcur,
            fixed_next: &fnext,
        };
        let h = composition_at(&vk.air, &coeffs, public_inputs, domain, domain.lde_point(i), &frame)
            .context("composition undefined on the LDE")?;
        h_evals.push(h);
    }
    let h_coeffs = interpolate_on_coset_pow2(&h_evals, domain.lde.shift)
        .context("interpolating the composition")?;
    ensure!(
        degree(&h_coeffs).map_or(true, |d| d < m * n),
        "composition polynomial exceeds degree bound {}",
        m * n
    );
    let comp_coeffs = h_coeffs.chunks(n).take(m).map(<[F]>::to_vec).collect();
    let cc = CommittedColumns::commit(params::LEAF_COMPOSITION, comp_coeffs, domain)?;

    // Out-of-domain frame.
    let z = protocol::draw_ood_point(&mut tr, &cc.tree.root(), domain);
    let gz = z * domain.trace_gen();
    let ood = OodFrame {
        trace_z: tc.eval_at(z),
        trace_gz: tc.eval_at(gz),
        fixed_z: fc.eval_at(z),
        fixed_gz: fc.eval_at(gz),
        composition_z: cc.eval_at(z),
    };
    let deep = DeepCoeffs::draw(&mut tr, &ood, trace.len(), fc.coeffs.len(), m);
    debug!(lde_len, "trace and composition committed");

    // FRI layer 0: the DEEP composition on the LDE.
    let mut layer0 = Vec::with_capacity(lde_len);
    for i in 0..lde_len {
        let (t, f, c) = (tc.row(i), fc.row(i), cc.row(i));
        let row = DeepRow {
            trace: &t,
            fixed: &f,
            composition: &c,
        };
        let v = deep_value(&deep, &ood, z, gz, domain.lde_point(i), &row)
            .context("DEEP quotient undefined on the LDE")?;
        layer0.push(v);
    }

    // FRI commit phase.
    let num_folds = vk.num_folds() as usize;
    let cosets = layer_cosets(&domain.lde, num_folds);
    ensure!(cosets.len() == num_folds + 1, "LDE too small for {num_folds} folds");
    let mut layers = vec![layer0];
    let mut trees = Vec::with_capacity(num_folds.saturating_sub(1));
    for r in 0..num_folds {
        let beta = tr.challenge_field_element(params::DS_FRI_BETA);
        let next = fold_layer(&layers[r], beta, &cosets[r]).context("folding FRI layer")?;
        if r + 1 < num_folds {
            let tree = commit_pairs(&next)?;
            tr.absorb(params::DS_FRI_LAYER_ROOT, &tree.root());
            trees.push(tree);
        }
        layers.push(next);
    }
    let max_len = 1usize << vk.fri.log_remainder_len;
    let mut remainder = interpolate_on_coset_pow2(&layers[num_folds], cosets[num_folds].shift)
        .context("interpolating the FRI remainder")?;
    ensure!(
        degree(&remainder).map_or(true, |d| d < max_len),
        "FRI remainder exceeds {max_len} coefficients"
    );
    remainder.truncate(max_len);
    tr.absorb_u64(params::DS_FRI_REMAINDER_LEN, remainder.len() as u64);
    tr.absorb_field_elements(params::DS_FRI_REMAINDER, &remainder);

    // Query phase.
    let indices = protocol::draw_query_indices(&mut tr, vk.fri.num_queries as usize, lde_len);
    let mut queries = Vec::with_capacity(indices.len());
    for &index in &indices {
        let [p0, p1] = domain.query_pair(index);
        let mut fri_layers = Vec::with_capacity(trees.len());
        let mut pos = p0;
        for (layer, tree) in layers[1..num_folds].iter().zip(&trees) {
            let half = layer.len() / 2;
            let k = pos % half;
            fri_layers.push(FriLayerOpening {
                pair: [layer[k], layer[k + half]],
                path: tree.open(k)?,
            });
            pos = k;
        }
        queries.push(QueryOpening {
            trace: [tc.open(p0)?, tc.open(p1)?],
            fixed: [fc.open(p0)?, fc.open(p1)?],
            composition: [cc.open(p0)?, cc.open(p1)?],
            fri_layers,
        });
    }
    debug!(queries = queries.len(), folds = num_folds, "proof assembled");

    Ok(StarkProof {
        public_inputs: public_inputs.to_vec(),
        trace_root: tc.tree.root(),
        composition_root: cc.tree.root(),
        ood,
        fri: FriProof {
            layer_roots: trees.iter().map(MerkleTree::root).collect(),
            remainder,
        },
        queries,
    })
}
