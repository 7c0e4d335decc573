//! Byte-level entry points of the zkv STARK verifier.
//!
//! Callers hand over encoded proofs and verification keys; everything
//! protocol-specific stays inside [`zkv_stark`]. The boolean functions are
//! the embedder surface, the `*_detailed` ones keep the rejection reason.
//!
//! ```no_run
//! # fn load(_: &str) -> Vec<u8> { Vec::new() }
//! zkv_verifier::initialize();
//! let ok = zkv_verifier::verify(&load("proof.bin"), &load("vk.bin"));
//! # let _ = ok;
//! ```

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
#![allow(clippy::module_name_repetitions)]

mod config;

pub use config::VerifierConfig;
pub use zkv_stark::{RejectKind, VerifyError, VerifyResult};

use tracing::debug;
use zkv_stark::codec::{decode_proof, decode_public_inputs, decode_vk};
use zkv_stark::{verify_with, StarkProof, VerificationKey, VerifyOptions};

/// Build the shared precomputed tables. Idempotent and thread-safe; calling
/// it is optional but moves the one-off cost out of the first verification.
pub fn initialize() {
    zkv_stark::initialize();
}

/// Verify an encoded proof against an encoded key with default limits.
#[must_use]
pub fn verify(proof_bytes: &[u8], vk_bytes: &[u8]) -> bool {
    StarkVerifier::default().verify(proof_bytes, vk_bytes)
}

/// Like [`verify`] but returns the rejection reason.
///
/// # Errors
/// The first failed check.
pub fn verify_detailed(proof_bytes: &[u8], vk_bytes: &[u8]) -> VerifyResult<()> {
    StarkVerifier::default().verify_detailed(proof_bytes, vk_bytes)
}

/// Verify and additionally require the proof's public inputs to equal
/// `public_inputs_bytes` (concatenated 8-byte little-endian field elements).
#[must_use]
pub fn verify_with_public_inputs(proof_bytes: &[u8], public_inputs_bytes: &[u8], vk_bytes: &[u8]) -> bool {
    StarkVerifier::default()
        .verify_with_public_inputs_detailed(proof_bytes, public_inputs_bytes, vk_bytes)
        .is_ok()
}

/// A verifier with its own size limits and parallelism setting.
#[derive(Clone, Debug, Default)]
pub struct StarkVerifier {
    config: VerifierConfig,
}

impl StarkVerifier {
    /// Verifier with the given configuration.
    #[must_use]
    pub const fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Boolean form of [`Self::verify_detailed`].
    #[must_use]
    pub fn verify(&self, proof_bytes: &[u8], vk_bytes: &[u8]) -> bool {
        self.verify_detailed(proof_bytes, vk_bytes).is_ok()
    }

    /// Decode both envelopes and verify.
    ///
    /// The proof may be no larger than both the configured limit and the
    /// key's own size budget.
    ///
    /// # Errors
    /// The first failed check.
    pub fn verify_detailed(&self, proof_bytes: &[u8], vk_bytes: &[u8]) -> VerifyResult<()> {
        let (proof, vk) = self.decode(proof_bytes, vk_bytes)?;
        self.check(&proof, &vk)
    }

    /// Boolean form of [`Self::verify_with_public_inputs_detailed`].
    #[must_use]
    pub fn verify_with_public_inputs(&self, proof_bytes: &[u8], public_inputs_bytes: &[u8], vk_bytes: &[u8]) -> bool {
        self.verify_with_public_inputs_detailed(proof_bytes, public_inputs_bytes, vk_bytes)
            .is_ok()
    }

    /// Verify and check the proof's public inputs against the caller's.
    ///
    /// # Errors
    /// [`VerifyError::PublicInputMismatch`] if they differ, otherwise the
    /// first failed check.
    pub fn verify_with_public_inputs_detailed(
        &self,
        proof_bytes: &[u8],
        public_inputs_bytes: &[u8],
        vk_bytes: &[u8],
    ) -> VerifyResult<()> {
        let (proof, vk) = self.decode(proof_bytes, vk_bytes)?;
        let expected = decode_public_inputs(public_inputs_bytes)?;
        if expected != proof.public_inputs {
            debug!(
                expected = expected.len(),
                bound = proof.public_inputs.len(),
                "public inputs differ from the proof"
            );
            return Err(VerifyError::PublicInputMismatch);
        }
        self.check(&proof, &vk)
    }

    /// Verify already-decoded objects.
    ///
    /// # Errors
    /// The first failed check.
    pub fn verify_decoded(&self, proof: &StarkProof, vk: &VerificationKey) -> VerifyResult<()> {
        self.check(proof, vk)
    }

    fn decode(&self, proof_bytes: &[u8], vk_bytes: &[u8]) -> VerifyResult<(StarkProof, VerificationKey)> {
        let vk = decode_vk(vk_bytes, self.config.max_vk_bytes)?;
        vk.validate()?;
        let budget = usize::try_from(vk.budget().max_proof_bytes).unwrap_or(usize::MAX);
        let limit = self.config.max_proof_bytes.min(budget);
        let proof = decode_proof(proof_bytes, limit)?;
        debug!(
            proof_bytes = proof_bytes.len(),
            vk_bytes = vk_bytes.len(),
            limit,
            "envelopes decoded"
        );
        Ok((proof, vk))
    }

    fn check(&self, proof: &StarkProof, vk: &VerificationKey) -> VerifyResult<()> {
        let opts = VerifyOptions {
            parallel: self.config.parallel,
        };
        verify_with(proof, vk, opts)
    }
}
