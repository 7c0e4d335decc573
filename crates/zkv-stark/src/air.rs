//! Algebraic intermediate representation (AIR).
//!
//! An AIR is an ordered list of transition constraints and boundary
//! constraints over a trace of `trace_width` columns and `fixed_width`
//! preprocessed columns, on a trace of `n = 2^log_trace_len` rows.
//!
//! - A transition constraint is a sum of monomials over the current and next
//!   row of trace and fixed columns. It must vanish on every row except the
//!   last (the next row of the last row wraps to row 0).
//! - A boundary constraint pins one trace cell to a constant or to a public
//!   input.
//!
//! The same evaluation code runs on field values at any point, so the
//! verifier evaluates constraints on the OOD frame and the fixture prover
//! evaluates them row by row on the LDE.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use zkv_ffts::Goldilocks as F;

use crate::error::{VerifyError, VerifyResult};
use crate::params;

/// A column reference inside a constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Var {
    /// Trace column at the current row.
    Trace(u32),
    /// Trace column at the next row.
    TraceNext(u32),
    /// Fixed column at the current row.
    Fixed(u32),
    /// Fixed column at the next row.
    FixedNext(u32),
}

/// `coeff · Π var^exp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monomial {
    /// Scalar coefficient.
    pub coeff: F,
    /// Factors with their exponents.
    pub vars: Vec<(Var, u32)>,
}

impl Monomial {
    /// Constant monomial.
    #[must_use]
    pub const fn constant(coeff: F) -> Self {
        Self {
            coeff,
            vars: Vec::new(),
        }
    }

    /// `coeff · var`.
    #[must_use]
    pub fn linear(coeff: F, var: Var) -> Self {
        Self {
            coeff,
            vars: vec![(var, 1)],
        }
    }

    /// `coeff · var^exp`.
    #[must_use]
    pub fn power(coeff: F, var: Var, exp: u32) -> Self {
        Self {
            coeff,
            vars: vec![(var, exp)],
        }
    }

    /// Total degree.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.vars.iter().map(|(_, e)| *e).sum()
    }

    fn eval(&self, frame: &Frame<'_>) -> F {
        self.vars
            .iter()
            .fold(self.coeff, |acc, (v, e)| acc * frame.get(*v).pow(u64::from(*e)))
    }
}

/// One transition constraint: `Σ monomials = 0` on every non-last row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConstraint {
    /// Summands.
    pub terms: Vec<Monomial>,
}

impl TransitionConstraint {
    /// Build from monomials.
    #[must_use]
    pub fn new(terms: Vec<Monomial>) -> Self {
        Self { terms }
    }

    /// Maximum monomial degree.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.terms.iter().map(Monomial::degree).max().unwrap_or(0)
    }

    /// Evaluate on a frame.
    #[must_use]
    pub fn eval(&self, frame: &Frame<'_>) -> F {
        self.terms.iter().map(|m| m.eval(frame)).sum()
    }
}

/// Row selector of a boundary constraint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryRow {
    /// Row 0.
    First,
    /// Row `n - 1`.
    Last,
    /// An explicit row.
    At(u64),
}

impl BoundaryRow {
    /// Absolute row index for a trace of `n` rows.
    #[must_use]
    pub const fn resolve(self, n: u64) -> u64 {
        match self {
            Self::First => 0,
            Self::Last => n.saturating_sub(1),
            Self::At(r) => r,
        }
    }
}

/// Value a boundary cell must take.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryValue {
    /// A constant baked into the AIR.
    Constant(F),
    /// The public input with this index.
    Public(u32),
}

/// `trace[column][row] == value`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryConstraint {
    /// Trace column.
    pub column: u32,
    /// Row.
    pub row: BoundaryRow,
    /// Required value.
    pub value: BoundaryValue,
}

impl BoundaryConstraint {
    /// Resolve the required value against the public inputs.
    ///
    /// Returns `None` for an out-of-range public index.
    #[must_use]
    pub fn target(&self, public: &[F]) -> Option<F> {
        match self.value {
            BoundaryValue::Constant(c) => Some(c),
            BoundaryValue::Public(i) => public.get(i as usize).copied(),
        }
    }
}

/// Column values around one point: current and next row of trace and fixed
/// columns.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    /// Trace values at the current row.
    pub trace: &'a [F],
    /// Trace values at the next row.
    pub trace_next: &'a [F],
    /// Fixed values at the current row.
    pub fixed: &'a [F],
    /// Fixed values at the next row.
    pub fixed_next: &'a [F],
}

impl Frame<'_> {
    /// Value of a variable.
    ///
    /// Callers must pass frames as wide as the widths the AIR was validated
    /// against. In release builds an absent column reads as zero.
    #[must_use]
    pub fn get(&self, v: Var) -> F {
        let (slice, i) = match v {
            Var::Trace(i) => (self.trace, i),
            Var::TraceNext(i) => (self.trace_next, i),
            Var::Fixed(i) => (self.fixed, i),
            Var::FixedNext(i) => (self.fixed_next, i),
        };
        debug_assert!(
            (i as usize) < slice.len(),
            "{v:?} outside a frame of width {}",
            slice.len()
        );
        slice.get(i as usize).copied().unwrap_or_default()
    }
}

/// A complete AIR program.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Air {
    /// Human-readable name, bound into the key digest.
    pub name: String,
    /// Number of public inputs a proof carries.
    pub num_public: u32,
    /// Transition constraints, in coefficient order.
    pub transitions: Vec<TransitionConstraint>,
    /// Boundary constraints, in coefficient order.
    pub boundaries: Vec<BoundaryConstraint>,
}

impl Air {
    /// Maximum transition degree (0 when there are none).
    #[must_use]
    pub fn max_degree(&self) -> u32 {
        self.transitions
            .iter()
            .map(TransitionConstraint::degree)
            .max()
            .unwrap_or(0)
    }

    /// Number of composition columns `m = max(1, d - 1)`.
    #[must_use]
    pub fn composition_width(&self) -> usize {
        self.max_degree().saturating_sub(1).max(1) as usize
    }

    /// Number of constraint-composition coefficients.
    #[must_use]
    pub fn num_constraints(&self) -> usize {
        self.transitions.len() + self.boundaries.len()
    }

    /// Check column references, exponents and rows against the key's shape.
    ///
    /// # Errors
    /// [`VerifyError::InvalidKey`] describing the first violation.
    pub fn validate(&self, trace_width: u32, fixed_width: u32, trace_len: u64) -> VerifyResult<()> {
        if self.transitions.len() > params::MAX_TRANSITIONS {
            return Err(VerifyError::invalid_key(format!(
                "{} transition constraints (max {})",
                self.transitions.len(),
                params::MAX_TRANSITIONS
            )));
        }
        if self.boundaries.len() > params::MAX_BOUNDARIES {
            return Err(VerifyError::invalid_key(format!(
                "{} boundary constraints (max {})",
                self.boundaries.len(),
                params::MAX_BOUNDARIES
            )));
        }
        if self.num_public > params::MAX_PUBLIC_INPUTS {
            return Err(VerifyError::invalid_key(format!(
                "{} public inputs (max {})",
                self.num_public,
                params::MAX_PUBLIC_INPUTS
            )));
        }

        for (t, c) in self.transitions.iter().enumerate() {
            if c.degree() == 0 {
                return Err(VerifyError::invalid_key(format!(
                    "transition {t} has degree 0"
                )));
            }
            for m in &c.terms {
                for (v, e) in &m.vars {
                    if *e == 0 || *e > params::MAX_EXPONENT {
                        return Err(VerifyError::invalid_key(format!(
                            "transition {t}: exponent {e} outside 1..={}",
                            params::MAX_EXPONENT
                        )));
                    }
                    let in_range = match *v {
                        Var::Trace(i) | Var::TraceNext(i) => i < trace_width,
                        Var::Fixed(i) | Var::FixedNext(i) => i < fixed_width,
                    };
                    if !in_range {
                        return Err(VerifyError::invalid_key(format!(
                            "transition {t}: {v:?} out of range"
                        )));
                    }
                }
            }
        }

        for (b, c) in self.boundaries.iter().enumerate() {
            if c.column >= trace_width {
                return Err(VerifyError::invalid_key(format!(
                    "boundary {b}: column {} out of range",
                    c.column
                )));
            }
            if let BoundaryRow::At(r) = c.row {
                if r >= trace_len {
                    return Err(VerifyError::invalid_key(format!(
                        "boundary {b}: row {r} outside trace of {trace_len} rows"
                    )));
                }
            }
            if let BoundaryValue::Public(i) = c.value {
                if i >= self.num_public {
                    return Err(VerifyError::invalid_key(format!(
                        "boundary {b}: public input {i} out of range"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Feed a canonical encoding of the AIR into `h`.
    pub(crate) fn hash_into(&self, h: &mut blake3::Hasher) {
        put_bytes(h, self.name.as_bytes());
        h.update(&self.num_public.to_le_bytes());
        h.update(&(self.transitions.len() as u64).to_le_bytes());
        for c in &self.transitions {
            h.update(&(c.terms.len() as u64).to_le_bytes());
            for m in &c.terms {
                h.update(&m.coeff.to_le_bytes());
                h.update(&(m.vars.len() as u64).to_le_bytes());
                for (v, e) in &m.vars {
                    let (tag, i) = match *v {
                        Var::Trace(i) => (0u8, i),
                        Var::TraceNext(i) => (1, i),
                        Var::Fixed(i) => (2, i),
                        Var::FixedNext(i) => (3, i),
                    };
                    h.update(&[tag]);
                    h.update(&i.to_le_bytes());
                    h.update(&e.to_le_bytes());
                }
            }
        }
        h.update(&(self.boundaries.len() as u64).to_le_bytes());
        for b in &self.boundaries {
            h.update(&b.column.to_le_bytes());
            match b.row {
                BoundaryRow::First => h.update(&[0]),
                BoundaryRow::Last => h.update(&[1]),
                BoundaryRow::At(r) => h.update(&[2]).update(&r.to_le_bytes()),
            };
            match b.value {
                BoundaryValue::Constant(c) => h.update(&[0]).update(&c.to_le_bytes()),
                BoundaryValue::Public(i) => h.update(&[1]).update(&i.to_le_bytes()),
            };
        }
    }
}

fn put_bytes(h: &mut blake3::Hasher, bytes: &[u8]) {
    h.update(&(bytes.len() as u64).to_le_bytes());
    h.update(bytes);
}

/* --------------------------------- Library --------------------------------- */

/// Small AIRs used by fixtures, tests and benches.
pub mod library {
    use super::{
        Air, BoundaryConstraint, BoundaryRow, BoundaryValue, Monomial, TransitionConstraint,
        Var, F,
    };

    fn one() -> F {
        F::one()
    }

    fn minus_one() -> F {
        F::from_i64(-1)
    }

    fn pinned(column: u32, row: BoundaryRow, public: u32) -> BoundaryConstraint {
        BoundaryConstraint {
            column,
            row,
            value: BoundaryValue::Public(public),
        }
    }

    /// Two columns `(a, b)` with `a' = b`, `b' = a + b`.
    ///
    /// Public inputs: `a[0]`, `b[0]`, `b[last]`.
    #[must_use]
    pub fn fibonacci() -> Air {
        Air {
            name: "fibonacci".into(),
            num_public: 3,
            transitions: vec![
                TransitionConstraint::new(vec![
                    Monomial::linear(one(), Var::TraceNext(0)),
                    Monomial::linear(minus_one(), Var::Trace(1)),
                ]),
                TransitionConstraint::new(vec![
                    Monomial::linear(one(), Var::TraceNext(1)),
                    Monomial::linear(minus_one(), Var::Trace(0)),
                    Monomial::linear(minus_one(), Var::Trace(1)),
                ]),
            ],
            boundaries: vec![
                pinned(0, BoundaryRow::First, 0),
                pinned(1, BoundaryRow::First, 1),
                pinned(1, BoundaryRow::Last, 2),
            ],
        }
    }

    /// One trace column stepped by one fixed column: `x' = x + s`.
    ///
    /// Public inputs: `x[0]`, `x[last]`.
    #[must_use]
    pub fn counter_with_fixed_step() -> Air {
        Air {
            name: "counter_with_fixed_step".into(),
            num_public: 2,
            transitions: vec![TransitionConstraint::new(vec![
                Monomial::linear(one(), Var::TraceNext(0)),
                Monomial::linear(minus_one(), Var::Trace(0)),
                Monomial::linear(minus_one(), Var::Fixed(0)),
            ])],
            boundaries: vec![
                pinned(0, BoundaryRow::First, 0),
                pinned(0, BoundaryRow::Last, 1),
            ],
        }
    }

    fn power_chain(name: &str, exp: u32) -> Air {
        Air {
            name: name.into(),
            num_public: 2,
            transitions: vec![TransitionConstraint::new(vec![
                Monomial::linear(one(), Var::TraceNext(0)),
                Monomial::power(minus_one(), Var::Trace(0), exp),
            ])],
            boundaries: vec![
                pinned(0, BoundaryRow::First, 0),
                pinned(0, BoundaryRow::Last, 1),
            ],
        }
    }

    /// `x' = x²`; public inputs `x[0]`, `x[last]`.
    #[must_use]
    pub fn square_chain() -> Air {
        power_chain("square_chain", 2)
    }

    /// `x' = x³`; public inputs `x[0]`, `x[last]`. Composition width 2.
    #[must_use]
    pub fn cube_chain() -> Air {
        power_chain("cube_chain", 3)
    }
}
