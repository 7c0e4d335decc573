//! Goldilocks prime field, power-of-two domains and NTT helpers.
//!
//! - `Fp64<P>`: prime field modulo a 64-bit prime `P` (const generic), always
//!   held in canonical form; serde encodes it as a `u64` and rejects
//!   non-canonical values on decode.
//! - Goldilocks: `p = 2^64 - 2^32 + 1`, two-adicity 32, generator 7.
//! - Modules: [`roots`] (precomputed 2-adic roots), [`domain`], [`twiddle`],
//!   [`ntt`], [`coset`] and [`poly`].
//!
//! Everything here is deterministic and allocation-light; the verifier only
//! evaluates at a handful of points, while the fixture prover uses the NTT
//! paths for low-degree extensions.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown
)]
#![allow(clippy::cast_possible_truncation, clippy::module_name_repetitions)]

pub mod domain;
pub use domain::{pow2_domain, Pow2Domain};

pub mod coset;
pub mod ntt; // in-place NTT/INTT and (eval <-> coeff) helpers
pub mod poly;
pub mod roots;
pub mod twiddle; // stage twiddle helpers

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 64-bit prime field element (const generic modulus).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fp64<const P: u64>(
    /// Canonical representative modulo `P`. Public for convenience.
    pub u64,
);

impl<const P: u64> Fp64<P> {
    /// Field modulus.
    pub const MODULUS: u64 = P;

    /// Zero.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// One.
    #[inline]
    #[must_use]
    pub const fn one() -> Self {
        Self(1 % P)
    }

    /// Whether this is the additive identity.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    const fn reduce(wide: u128) -> u64 {
        (wide % P as u128) as u64
    }

    /// `self^e`, square-and-multiply from the low bit.
    #[must_use]
    pub fn pow(self, e: u64) -> Self {
        let (mut acc, mut sq) = (Self::one(), self);
        let mut bits = e;
        while bits != 0 {
            if bits & 1 != 0 {
                acc *= sq;
            }
            sq = sq.square();
            bits >>= 1;
        }
        acc
    }

    /// `self · self`.
    #[inline]
    #[must_use]
    pub const fn square(self) -> Self {
        Self(Self::reduce(self.0 as u128 * self.0 as u128))
    }

    /// Multiplicative inverse by Fermat, `None` for zero.
    #[inline]
    #[must_use]
    pub fn try_inv(self) -> Option<Self> {
        (!self.is_zero()).then(|| self.pow(P - 2))
    }

    /// Inverse of a value the caller knows to be non-zero (zero maps to
    /// zero). Prefer [`Self::try_inv`] for data-dependent inputs.
    #[inline]
    #[must_use]
    pub fn inv(self) -> Self {
        self.pow(P - 2)
    }

    /// Signed integer, negatives wrapping to `P - |x|`.
    #[inline]
    #[must_use]
    pub const fn from_i64(x: i64) -> Self {
        Self((x as i128).rem_euclid(P as i128) as u64)
    }

    /// Any `u64`, reduced.
    #[inline]
    #[must_use]
    pub const fn from_u64(x: u64) -> Self {
        Self(x % P)
    }

    /// Any `u128`, reduced.
    #[inline]
    #[must_use]
    pub const fn from_u128(x: u128) -> Self {
        Self(Self::reduce(x))
    }

    /// `Some` only for `x < P`.
    #[inline]
    #[must_use]
    pub const fn from_canonical(x: u64) -> Option<Self> {
        if x < P {
            Some(Self(x))
        } else {
            None
        }
    }

    /// Canonical residue.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Canonical little-endian encoding.
    #[inline]
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Inverse of [`Self::to_le_bytes`]; `None` for non-canonical bytes.
    #[inline]
    #[must_use]
    pub const fn from_le_bytes(le: [u8; 8]) -> Option<Self> {
        Self::from_canonical(u64::from_le_bytes(le))
    }
}

impl<const P: u64> Default for Fp64<P> {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}

impl<const P: u64> From<u64> for Fp64<P> {
    #[inline]
    fn from(x: u64) -> Self {
        Self::from_u64(x)
    }
}

impl<const P: u64> fmt::Display for Fp64<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<const P: u64> Add for Fp64<P> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        // Both operands are < P < 2^64, so one conditional subtraction suffices.
        let (s, carry) = self.0.overflowing_add(rhs.0);
        if carry || s >= P {
            Self(s.wrapping_sub(P))
        } else {
            Self(s)
        }
    }
}

impl<const P: u64> Sub for Fp64<P> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (d, borrow) = self.0.overflowing_sub(rhs.0);
        if borrow {
            Self(d.wrapping_add(P))
        } else {
            Self(d)
        }
    }
}

impl<const P: u64> Mul for Fp64<P> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(Self::reduce(u128::from(self.0) * u128::from(rhs.0)))
    }
}

impl<const P: u64> Neg for Fp64<P> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::zero() - self
    }
}

macro_rules! assign_via_binop {
    ($($tr:ident :: $method:ident => $op:tt),* $(,)?) => {$(
        impl<const P: u64> $tr for Fp64<P> {
            #[inline]
            fn $method(&mut self, rhs: Self) {
                *self = *self $op rhs;
            }
        }
    )*};
}

assign_via_binop! {
    AddAssign::add_assign => +,
    SubAssign::sub_assign => -,
    MulAssign::mul_assign => *,
}

impl<const P: u64> core::iter::Sum for Fp64<P> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<const P: u64> core::iter::Product for Fp64<P> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), Mul::mul)
    }
}

impl<const P: u64> Serialize for Fp64<P> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(self.0)
    }
}

impl<'de, const P: u64> Deserialize<'de> for Fp64<P> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = u64::deserialize(d)?;
        Self::from_canonical(raw).ok_or_else(|| {
            <D::Error as serde::de::Error>::custom(format!(
                "non-canonical field element {raw:#018x}"
            ))
        })
    }
}

/* ---------------- Goldilocks helpers ---------------- */

/// Goldilocks prime `p = 2^64 - 2^32 + 1`.
pub const GOLDILOCKS: u64 = 0xffff_ffff_0000_0001;

/// Two-adicity of `p - 1`.
pub const TWO_ADICITY: u32 = 32;

/// Multiplicative generator of the Goldilocks field.
pub const GENERATOR: Goldilocks = Fp64::<GOLDILOCKS>(7);

/// Goldilocks field element type.
pub type Goldilocks = Fp64<GOLDILOCKS>;
