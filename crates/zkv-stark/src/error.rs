//! Verification failures and their coarse classification.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use core::fmt;

use thiserror::Error;
use zkv_merkle::MerkleError;

/// Coarse failure category of a rejected proof.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RejectKind {
    /// Malformed bytes, invalid key, or a proof whose shape does not match
    /// the key.
    Structural,
    /// A Merkle opening does not reproduce its committed root.
    CommitmentMismatch,
    /// An algebraic identity (OOD composition, FRI fold, remainder) fails.
    AlgebraicMismatch,
    /// The FRI remainder exceeds the declared degree bound.
    DegreeBound,
    /// Arithmetic left its domain (inversion of zero, impossible index).
    Domain,
}

impl fmt::Display for RejectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Structural => "structural",
            Self::CommitmentMismatch => "commitment-mismatch",
            Self::AlgebraicMismatch => "algebraic-mismatch",
            Self::DegreeBound => "degree-bound",
            Self::Domain => "domain",
        };
        f.write_str(s)
    }
}

/// Why a proof was rejected. The first failure in protocol order wins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Input exceeds the configured byte limit.
    #[error("{what} is {len} bytes, limit is {limit}")]
    TooLarge {
        /// Which input.
        what: &'static str,
        /// Actual length.
        len: usize,
        /// Configured limit.
        limit: usize,
    },
    /// Envelope shorter than its fixed header.
    #[error("{0} envelope is truncated")]
    Truncated(&'static str),
    /// Envelope magic does not match.
    #[error("bad magic for {what}: found {found}")]
    BadMagic {
        /// Which input.
        what: &'static str,
        /// Hex of the bytes found.
        found: String,
    },
    /// Envelope version is not supported.
    #[error("unsupported {what} format version {version}")]
    UnsupportedVersion {
        /// Which input.
        what: &'static str,
        /// Version found.
        version: u16,
    },
    /// Payload failed to decode (truncation, trailing bytes, non-canonical
    /// field elements, over-limit lengths).
    #[error("malformed {what} payload: {reason}")]
    Decode {
        /// Which input.
        what: &'static str,
        /// Decoder message.
        reason: String,
    },
    /// Verification key violates a protocol limit.
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
    /// Proof shape does not match the verification key.
    #[error("proof shape mismatch: {0}")]
    Shape(String),
    /// Caller-supplied public inputs differ from the ones bound in the proof.
    #[error("public inputs do not match the proof")]
    PublicInputMismatch,
    /// Malformed authentication path.
    #[error("{what} authentication path: {source}")]
    MerklePath {
        /// Which commitment.
        what: &'static str,
        /// Underlying structural error.
        #[source]
        source: MerkleError,
    },
    /// An opening does not reproduce its root.
    #[error("{what} opening at position {index} does not match its root")]
    CommitmentMismatch {
        /// Which commitment.
        what: &'static str,
        /// Leaf position.
        index: usize,
    },
    /// OOD composition identity fails.
    #[error("out-of-domain composition check failed")]
    OodMismatch,
    /// A FRI layer value differs from the fold of the previous pair.
    #[error("FRI fold mismatch in layer {layer} for query {query}")]
    FriFold {
        /// Query number.
        query: usize,
        /// Layer holding the mismatching value.
        layer: usize,
    },
    /// The last fold differs from the remainder polynomial.
    #[error("FRI remainder mismatch for query {query}")]
    FriRemainder {
        /// Query number.
        query: usize,
    },
    /// Remainder polynomial too long.
    #[error("FRI remainder has {len} coefficients, bound is {max}")]
    RemainderDegree {
        /// Coefficients supplied.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// Inversion of zero.
    #[error("division by zero while {0}")]
    DivisionByZero(&'static str),
    /// Index outside its evaluation domain.
    #[error("index {index} outside domain of size {size}")]
    IndexOutOfDomain {
        /// Offending index.
        index: usize,
        /// Domain size.
        size: usize,
    },
}

impl VerifyError {
    /// Category of this failure.
    #[must_use]
    pub const fn kind(&self) -> RejectKind {
        match self {
            Self::TooLarge { .. }
            | Self::Truncated(_)
            | Self::BadMagic { .. }
            | Self::UnsupportedVersion { .. }
            | Self::Decode { .. }
            | Self::InvalidKey(_)
            | Self::Shape(_)
            | Self::PublicInputMismatch
            | Self::MerklePath { .. } => RejectKind::Structural,
            Self::CommitmentMismatch { .. } => RejectKind::CommitmentMismatch,
            Self::OodMismatch | Self::FriFold { .. } | Self::FriRemainder { .. } => {
                RejectKind::AlgebraicMismatch
            }
            Self::RemainderDegree { .. } => RejectKind::DegreeBound,
            Self::DivisionByZero(_) | Self::IndexOutOfDomain { .. } => RejectKind::Domain,
        }
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    pub(crate) fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }
}

/// Result alias for verification.
pub type VerifyResult<T> = Result<T, VerifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_categories() {
        assert_eq!(VerifyError::Truncated("proof").kind(), RejectKind::Structural);
        assert_eq!(
            VerifyError::CommitmentMismatch { what: "trace", index: 3 }.kind(),
            RejectKind::CommitmentMismatch
        );
        assert_eq!(VerifyError::OodMismatch.kind(), RejectKind::AlgebraicMismatch);
        assert_eq!(
            VerifyError::RemainderDegree { len: 9, max: 8 }.kind(),
            RejectKind::DegreeBound
        );
        assert_eq!(VerifyError::DivisionByZero("x").kind(), RejectKind::Domain);
        assert_eq!(RejectKind::DegreeBound.to_string(), "degree-bound");
    }
}
