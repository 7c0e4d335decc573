//! Constraint composition.
//!
//! ```text
//! H(x) = Σ_t α_t · C_t(frame(x)) · (x − g^(n−1)) / (x^n − 1)
//!      + Σ_b β_b · (T_col(x) − v_b) / (x − g^row_b)
//! ```
//!
//! `H` has degree below `m·n` and is committed as `m` columns with
//! `H(x) = Σ_i x^(i·n) · H_i(x)`. The verifier evaluates the right-hand side
//! on the OOD frame; the fixture prover evaluates it on every LDE row.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use zkv_ffts::Goldilocks as F;

use crate::air::{Air, Frame, Var};
use crate::domain::StarkDomain;
use crate::protocol::ConstraintCoeffs;

/// Evaluate `H(x)` from the column values around `x`.
///
/// Returns `None` when `x` is a root of a denominator (a point of the trace
/// subgroup) or a boundary references a missing public input.
#[must_use]
pub fn composition_at(
    air: &Air,
    coeffs: &ConstraintCoeffs,
    public: &[F],
    domain: &StarkDomain,
    x: F,
    frame: &Frame<'_>,
) -> Option<F> {
    let n = domain.trace_len() as u64;
    let last = domain.row_point(n - 1);

    let vanishing_inv = domain.trace.vanishing_at(x).try_inv()?;
    let transitions: F = air
        .transitions
        .iter()
        .zip(&coeffs.transition)
        .map(|(c, a)| *a * c.eval(frame))
        .sum();
    let mut acc = transitions * (x - last) * vanishing_inv;

    for (b, beta) in air.boundaries.iter().zip(&coeffs.boundary) {
        let target = b.target(public)?;
        let denom_inv = (x - domain.row_point(b.row.resolve(n))).try_inv()?;
        acc += *beta * (frame.get(Var::Trace(b.column)) - target) * denom_inv;
    }
    Some(acc)
}

/// Recombine committed column values: `Σ_i x^(i·n) · H_i(x)`.
#[must_use]
pub fn combine_columns(columns: &[F], x: F, trace_len: usize) -> F {
    let step = x.pow(trace_len as u64);
    columns
        .iter()
        .rev()
        .fold(F::zero(), |acc, h| acc * step + *h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::library;

    fn f(x: u64) -> F {
        F::from_u64(x)
    }

    #[test]
    fn combine_matches_split_powers() {
        let x = f(11);
        let cols = [f(3), f(5), f(7)];
        let n = 4;
        let xn = x.pow(4);
        assert_eq!(
            combine_columns(&cols, x, n),
            cols[0] + xn * cols[1] + xn * xn * cols[2]
        );
    }

    #[test]
    fn undefined_on_trace_domain() {
        let air = library::fibonacci();
        let domain = StarkDomain::new(2, 1);
        let coeffs = ConstraintCoeffs {
            transition: vec![f(1); 2],
            boundary: vec![f(1); 3],
        };
        let zeros = [F::zero(); 2];
        let frame = Frame {
            trace: &zeros,
            trace_next: &zeros,
            fixed: &[],
            fixed_next: &[],
        };
        let public = [f(1), f(1), f(5)];
        assert!(composition_at(&air, &coeffs, &public, &domain, domain.row_point(1), &frame).is_none());
        assert!(composition_at(&air, &coeffs, &public, &domain, f(2) * domain.lde_point(0), &frame).is_some());
        assert!(composition_at(&air, &coeffs, &public[..2], &domain, domain.lde_point(0), &frame).is_none());
    }
}
