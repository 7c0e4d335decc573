//! Protocol constants, transcript labels and admission limits.
//!
//! These are the only knobs the prover and verifier read directly.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use zkv_ffts::{Goldilocks as F, GENERATOR};

/* --------------------------------- Domains --------------------------------- */

/// Shift of the LDE coset `D = shift · ⟨ω⟩`.
pub const LDE_SHIFT: F = GENERATOR;

/* -------------------------- Transcript label strings ------------------------ */

/// Top-level protocol domain string.
pub const DOMAIN_SEP: &str = "zkv-stark/v1";

/// Verification-key digest.
pub const DS_VK_DIGEST: &str = "vk_digest";
/// Preprocessed (fixed) column commitment.
pub const DS_FIXED_ROOT: &str = "fixed_root";
/// Number of public inputs.
pub const DS_N_PUBLIC: &str = "n_public";
/// Public input values.
pub const DS_PUBLIC: &str = "public";
/// Trace commitment.
pub const DS_TRACE_ROOT: &str = "trace_root";
/// Constraint-composition coefficients (transitions, then boundaries).
pub const DS_CONSTRAINT_COEFFS: &str = "constraint_coeffs";
/// Composition-column commitment.
pub const DS_COMPOSITION_ROOT: &str = "composition_root";
/// Out-of-domain point `z`.
pub const DS_OOD_POINT: &str = "ood_point";
/// OOD frame values.
pub const DS_OOD_FRAME: &str = "ood_frame";
/// DEEP combination coefficients.
pub const DS_DEEP_COEFFS: &str = "deep_coeffs";
/// FRI folding challenge.
pub const DS_FRI_BETA: &str = "fri_beta";
/// FRI committed layer root.
pub const DS_FRI_LAYER_ROOT: &str = "fri_layer_root";
/// Length of the FRI remainder polynomial.
pub const DS_FRI_REMAINDER_LEN: &str = "fri_remainder_len";
/// FRI remainder coefficients.
pub const DS_FRI_REMAINDER: &str = "fri_remainder";
/// Query positions on the LDE domain.
pub const DS_QUERY_INDICES: &str = "query_indices";

/* ------------------------------ Merkle leaf labels -------------------------- */

/// Leaves of the trace LDE commitment.
pub const LEAF_TRACE: &str = "trace";
/// Leaves of the fixed-column LDE commitment.
pub const LEAF_FIXED: &str = "fixed";
/// Leaves of the composition-column commitment.
pub const LEAF_COMPOSITION: &str = "composition";
/// Pair leaves of committed FRI layers.
pub const LEAF_FRI: &str = "fri";

/* ---------------------------------- Limits ---------------------------------- */

/// Smallest accepted `log2` trace length.
pub const MIN_LOG_TRACE_LEN: u32 = 2;
/// Largest accepted `log2` trace length.
pub const MAX_LOG_TRACE_LEN: u32 = 22;
/// Smallest accepted `log2` blowup.
pub const MIN_LOG_BLOWUP: u32 = 1;
/// Largest accepted `log2` blowup.
pub const MAX_LOG_BLOWUP: u32 = 6;
/// Largest `log2` LDE size; the trace and blowup bounds never exceed it.
pub const MAX_LOG_LDE_LEN: u32 = 28;
const _: () = assert!(MAX_LOG_TRACE_LEN + MAX_LOG_BLOWUP <= MAX_LOG_LDE_LEN);
/// Largest accepted query count.
pub const MAX_NUM_QUERIES: u32 = 128;
/// Largest accepted trace width.
pub const MAX_TRACE_WIDTH: u32 = 256;
/// Largest accepted fixed-column width.
pub const MAX_FIXED_WIDTH: u32 = 64;
/// Largest accepted number of transition constraints.
pub const MAX_TRANSITIONS: usize = 1024;
/// Largest accepted number of boundary constraints.
pub const MAX_BOUNDARIES: usize = 1024;
/// Largest accepted monomial exponent.
pub const MAX_EXPONENT: u32 = 16;
/// Largest accepted number of public inputs.
pub const MAX_PUBLIC_INPUTS: u32 = 1024;

/// Default proof size cap (bytes).
pub const DEFAULT_MAX_PROOF_BYTES: usize = 64 << 20;
/// Default verification-key size cap (bytes).
pub const DEFAULT_MAX_VK_BYTES: usize = 4 << 20;
