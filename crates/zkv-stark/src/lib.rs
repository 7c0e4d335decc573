//! STARK proof verification over Goldilocks with BLAKE3 commitments.
//!
//! - [`air`]: constraint systems (transition + boundary constraints) and a
//!   small library of toy AIRs.
//! - [`vk`]: verification keys, their limits, digest and cost budget.
//! - [`proof`] / [`codec`]: proof objects and their versioned byte envelope.
//! - [`protocol`]: the transcript schedule shared with the fixture prover.
//! - [`composition`], [`deep`], [`fri`]: the algebra checked by the verifier.
//! - [`verifier`]: the orchestrator, [`verify`].
//!
//! Verification is a pure function of `(proof, key)`; a rejection carries a
//! [`VerifyError`] whose [`VerifyError::kind`] classifies it.

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
#![allow(
    clippy::cast_possible_truncation,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc
)]

pub mod air;
pub mod codec;
pub mod composition;
pub mod deep;
pub mod domain;
pub mod error;
pub mod fri;
pub mod params;
pub mod proof;
pub mod protocol;
pub mod verifier;
pub mod vk;

pub use air::Air;
pub use error::{RejectKind, VerifyError, VerifyResult};
pub use proof::StarkProof;
pub use verifier::{verify, verify_with, VerifyOptions};
pub use vk::{FriOptions, VerificationKey};

/// Field element type used throughout the protocol.
pub type Felt = zkv_ffts::Goldilocks;

/// 32-byte commitment digest.
pub use zkv_merkle::Digest;

/// Build the shared precomputed tables. Idempotent.
pub fn initialize() {
    zkv_ffts::roots::init();
}
