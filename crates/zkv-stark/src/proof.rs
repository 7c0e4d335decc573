//! Structured proof objects.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use zkv_ffts::Goldilocks as F;
use zkv_merkle::Digest;

/// Column values at the OOD point `z` and at `g·z`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OodFrame {
    /// `T_j(z)` per trace column.
    pub trace_z: Vec<F>,
    /// `T_j(g·z)` per trace column.
    pub trace_gz: Vec<F>,
    /// `S_j(z)` per fixed column.
    pub fixed_z: Vec<F>,
    /// `S_j(g·z)` per fixed column.
    pub fixed_gz: Vec<F>,
    /// `H_i(z)` per composition column.
    pub composition_z: Vec<F>,
}

impl OodFrame {
    /// All values in transcript order.
    #[must_use]
    pub fn flatten(&self) -> Vec<F> {
        [
            &self.trace_z,
            &self.trace_gz,
            &self.fixed_z,
            &self.fixed_gz,
            &self.composition_z,
        ]
        .into_iter()
        .flatten()
        .copied()
        .collect()
    }
}

/// One committed row with its authentication path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOpening {
    /// Row values.
    pub values: Vec<F>,
    /// Siblings, bottom to top.
    pub path: Vec<Digest>,
}

/// One opened pair leaf of a committed FRI layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriLayerOpening {
    /// `[v[k], v[k + size/2]]`.
    pub pair: [F; 2],
    /// Siblings, bottom to top.
    pub path: Vec<Digest>,
}

/// Openings answering one query.
///
/// Row pairs are at LDE positions `(p, p + N/2)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOpening {
    /// Trace rows.
    pub trace: [RowOpening; 2],
    /// Fixed rows.
    pub fixed: [RowOpening; 2],
    /// Composition rows.
    pub composition: [RowOpening; 2],
    /// Committed FRI layers `1..R`.
    pub fri_layers: Vec<FriLayerOpening>,
}

/// FRI commit-phase data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriProof {
    /// Roots of layers `1..R` (exactly `R - 1`).
    pub layer_roots: Vec<Digest>,
    /// Coefficients of the terminal polynomial, low degree first.
    pub remainder: Vec<F>,
}

/// A complete STARK proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarkProof {
    /// Public inputs bound by the boundary constraints.
    pub public_inputs: Vec<F>,
    /// Commitment to the trace LDE.
    pub trace_root: Digest,
    /// Commitment to the composition columns' LDE.
    pub composition_root: Digest,
    /// Out-of-domain evaluations.
    pub ood: OodFrame,
    /// FRI commitments and remainder.
    pub fri: FriProof,
    /// Query answers, in challenge order.
    pub queries: Vec<QueryOpening>,
}
