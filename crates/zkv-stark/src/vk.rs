//! Verification key: the statement a proof is checked against.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use zkv_merkle::Digest;

use crate::air::Air;
use crate::error::{VerifyError, VerifyResult};
use crate::params;

/// Base field of the protocol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldId {
    /// `p = 2^64 - 2^32 + 1`.
    Goldilocks,
}

/// Hash function behind commitments and the transcript.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashId {
    /// BLAKE3 (32-byte digests).
    Blake3,
}

/// FRI / low-degree-test parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriOptions {
    /// `log2(N / n)`.
    pub log_blowup: u32,
    /// Number of query positions.
    pub num_queries: u32,
    /// `log2` of the remainder polynomial's coefficient bound.
    pub log_remainder_len: u32,
}

impl Default for FriOptions {
    fn default() -> Self {
        Self {
            log_blowup: 2,
            num_queries: 24,
            log_remainder_len: 1,
        }
    }
}

/// Everything the verifier needs besides the proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// Base field.
    pub field: FieldId,
    /// Hash function.
    pub hash: HashId,
    /// `log2` of the trace length `n`.
    pub log_trace_len: u32,
    /// Number of witness columns.
    pub trace_width: u32,
    /// Number of preprocessed columns.
    pub fixed_width: u32,
    /// Commitment to the LDE of the preprocessed columns.
    pub fixed_root: Digest,
    /// Constraint system.
    pub air: Air,
    /// Low-degree-test parameters.
    pub fri: FriOptions,
}

/// A-priori cost bound of one verification, for admission control.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifyBudget {
    /// Upper bound on the encoded size of a well-formed proof.
    pub max_proof_bytes: u64,
    /// Upper bound on BLAKE3 compressions-equivalent hash invocations.
    pub hash_invocations: u64,
}

impl VerificationKey {
    /// Trace length `n`.
    #[must_use]
    pub const fn trace_len(&self) -> u64 {
        1u64 << self.log_trace_len
    }

    /// Number of FRI folds `R = log_trace_len - log_remainder_len`.
    #[must_use]
    pub const fn num_folds(&self) -> u32 {
        self.log_trace_len.saturating_sub(self.fri.log_remainder_len)
    }

    /// Composition width `m`.
    #[must_use]
    pub fn composition_width(&self) -> usize {
        self.air.composition_width()
    }

    /// Check every protocol limit.
    ///
    /// # Errors
    /// [`VerifyError::InvalidKey`] describing the first violation.
    pub fn validate(&self) -> VerifyResult<()> {
        let fri = &self.fri;
        if !(params::MIN_LOG_TRACE_LEN..=params::MAX_LOG_TRACE_LEN).contains(&self.log_trace_len) {
            return Err(VerifyError::invalid_key(format!(
                "log_trace_len {} outside {}..={}",
                self.log_trace_len,
                params::MIN_LOG_TRACE_LEN,
                params::MAX_LOG_TRACE_LEN
            )));
        }
        if !(params::MIN_LOG_BLOWUP..=params::MAX_LOG_BLOWUP).contains(&fri.log_blowup) {
            return Err(VerifyError::invalid_key(format!(
                "log_blowup {} outside {}..={}",
                fri.log_blowup,
                params::MIN_LOG_BLOWUP,
                params::MAX_LOG_BLOWUP
            )));
        }
        if fri.num_queries == 0 || fri.num_queries > params::MAX_NUM_QUERIES {
            return Err(VerifyError::invalid_key(format!(
                "num_queries {} outside 1..={}",
                fri.num_queries,
                params::MAX_NUM_QUERIES
            )));
        }
        if fri.log_remainder_len >= self.log_trace_len {
            return Err(VerifyError::invalid_key(format!(
                "log_remainder_len {} leaves no FRI fold for log_trace_len {}",
                fri.log_remainder_len, self.log_trace_len
            )));
        }
        if self.trace_width == 0 || self.trace_width > params::MAX_TRACE_WIDTH {
            return Err(VerifyError::invalid_key(format!(
                "trace_width {} outside 1..={}",
                self.trace_width,
                params::MAX_TRACE_WIDTH
            )));
        }
        if self.fixed_width > params::MAX_FIXED_WIDTH {
            return Err(VerifyError::invalid_key(format!(
                "fixed_width {} exceeds {}",
                self.fixed_width,
                params::MAX_FIXED_WIDTH
            )));
        }
        self.air
            .validate(self.trace_width, self.fixed_width, self.trace_len())?;

        let m = self.composition_width();
        if m > 1usize << fri.log_blowup {
            return Err(VerifyError::invalid_key(format!(
                "composition width {m} exceeds blowup {}",
                1u32 << fri.log_blowup
            )));
        }
        Ok(())
    }

    /// Binding digest of the whole key (the `vkey_hash` of fixture files).
    #[must_use]
    pub fn digest(&self) -> Digest {
        let mut h = blake3::Hasher::new();
        h.update(b"zkv.vk.v1");
        h.update(&[match self.field {
            FieldId::Goldilocks => 0u8,
        }]);
        h.update(&[match self.hash {
            HashId::Blake3 => 0u8,
        }]);
        h.update(&self.log_trace_len.to_le_bytes());
        h.update(&self.trace_width.to_le_bytes());
        h.update(&self.fixed_width.to_le_bytes());
        h.update(&self.fixed_root);
        h.update(&self.fri.log_blowup.to_le_bytes());
        h.update(&self.fri.num_queries.to_le_bytes());
        h.update(&self.fri.log_remainder_len.to_le_bytes());
        self.air.hash_into(&mut h);
        *h.finalize().as_bytes()
    }

    /// Hex form of [`Self::digest`].
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }

    /// Upper bounds on proof size and hashing work for this key.
    ///
    /// Meaningful only for keys that pass [`Self::validate`].
    #[must_use]
    pub fn budget(&self) -> VerifyBudget {
        const DIGEST: u64 = 32;
        const FELT: u64 = 8;
        const LEN: u64 = 8;
        const ENVELOPE: u64 = 6;

        let tw = u64::from(self.trace_width);
        let fw = u64::from(self.fixed_width);
        let m = self.composition_width() as u64;
        let q = u64::from(self.fri.num_queries);
        let log_lde = u64::from(self.log_trace_len + self.fri.log_blowup);
        let folds = u64::from(self.num_folds());
        let committed = folds.saturating_sub(1);
        let remainder = 1u64 << self.fri.log_remainder_len;

        let row = |width: u64| LEN + width * FELT + LEN + log_lde * DIGEST;
        let per_query_rows = 2 * (row(tw) + row(fw) + row(m));
        // Layer r (1-based) has depth log_lde - r - 1.
        let fri_paths: u64 = (1..=committed)
            .map(|r| 2 * FELT + LEN + log_lde.saturating_sub(r + 1) * DIGEST)
            .sum();
        let per_query = per_query_rows + LEN + fri_paths;

        let header = ENVELOPE
            + LEN
            + u64::from(self.air.num_public) * FELT
            + 2 * DIGEST
            + 5 * LEN
            + (2 * tw + 2 * fw + m) * FELT
            + LEN
            + committed * DIGEST
            + LEN
            + remainder * FELT
            + LEN;

        let hashes_per_query = 6 * (1 + log_lde)
            + (1..=committed)
                .map(|r| 1 + log_lde.saturating_sub(r + 1))
                .sum::<u64>();
        // Transcript absorbs/challenges are bounded by the header size in
        // 64-byte blocks plus one per label.
        let transcript = header / 64 + 32 + folds * 2;

        VerifyBudget {
            max_proof_bytes: header + q * per_query,
            hash_invocations: q * hashes_per_query + transcript + 1,
        }
    }
}
