//! DEEP composition: the single polynomial handed to FRI.
//!
//! ```text
//! D(x) = Σ_j γ_j (T_j(x) − T_j(z)) / (x − z) + γ'_j (T_j(x) − T_j(gz)) / (x − gz)
//!      + (same for fixed columns)
//!      + Σ_i δ_i (H_i(x) − H_i(z)) / (x − z)
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use zkv_ffts::Goldilocks as F;

use crate::proof::OodFrame;
use crate::protocol::DeepCoeffs;

/// Opened column values at one LDE point.
#[derive(Copy, Clone, Debug)]
pub struct DeepRow<'a> {
    /// Trace values.
    pub trace: &'a [F],
    /// Fixed values.
    pub fixed: &'a [F],
    /// Composition-column values.
    pub composition: &'a [F],
}

fn quotient_sum(coeffs: &[F], values: &[F], at: &[F]) -> F {
    coeffs
        .iter()
        .zip(values.iter().zip(at))
        .map(|(c, (v, a))| *c * (*v - *a))
        .sum()
}

/// Evaluate `D(x)` at a point `x` outside `{z, g·z}`.
///
/// Returns `None` if `x` coincides with `z` or `g·z`.
#[must_use]
pub fn deep_value(
    coeffs: &DeepCoeffs,
    ood: &OodFrame,
    z: F,
    gz: F,
    x: F,
    row: &DeepRow<'_>,
) -> Option<F> {
    let inv_z = (x - z).try_inv()?;
    let inv_gz = (x - gz).try_inv()?;

    let at_z = quotient_sum(&coeffs.trace_z, row.trace, &ood.trace_z)
        + quotient_sum(&coeffs.fixed_z, row.fixed, &ood.fixed_z)
        + quotient_sum(&coeffs.composition, row.composition, &ood.composition_z);
    let at_gz = quotient_sum(&coeffs.trace_gz, row.trace, &ood.trace_gz)
        + quotient_sum(&coeffs.fixed_gz, row.fixed, &ood.fixed_gz);

    Some(at_z * inv_z + at_gz * inv_gz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hand_computation() {
        let f = F::from_u64;
        let coeffs = DeepCoeffs {
            trace_z: vec![f(2)],
            trace_gz: vec![f(3)],
            fixed_z: vec![],
            fixed_gz: vec![],
            composition: vec![f(5)],
        };
        let ood = OodFrame {
            trace_z: vec![f(10)],
            trace_gz: vec![f(20)],
            fixed_z: vec![],
            fixed_gz: vec![],
            composition_z: vec![f(30)],
        };
        let (z, gz, x) = (f(100), f(200), f(7));
        let row = DeepRow {
            trace: &[f(13)],
            fixed: &[],
            composition: &[f(31)],
        };
        let expect = (f(2) * (f(13) - f(10)) + f(5) * (f(31) - f(30))) * (x - z).inv()
            + f(3) * (f(13) - f(20)) * (x - gz).inv();
        assert_eq!(deep_value(&coeffs, &ood, z, gz, x, &row), Some(expect));
        assert_eq!(deep_value(&coeffs, &ood, z, gz, z, &row), None);
    }
}
