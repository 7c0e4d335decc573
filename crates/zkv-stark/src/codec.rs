//! Versioned binary envelopes for proofs and verification keys.
//!
//! Layout (version 1):
//!
//! ```text
//! offset 0 : magic, 4 bytes ("ZKVP" proof | "ZKVK" verification key)
//! offset 4 : format version, u16 little-endian
//! offset 6 : bincode payload (fixed-width LE integers, u64 length
//!            prefixes, u32 enum tags, canonical u64 field elements)
//! ```
//!
//! Trailing bytes after the payload are rejected, and the decoder never
//! allocates past the envelope's byte limit.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use zkv_ffts::Goldilocks as F;

use crate::error::{VerifyError, VerifyResult};
use crate::proof::StarkProof;
use crate::vk::VerificationKey;

/// Proof envelope magic.
pub const PROOF_MAGIC: [u8; 4] = *b"ZKVP";
/// Verification-key envelope magic.
pub const VK_MAGIC: [u8; 4] = *b"ZKVK";
/// Current envelope version.
pub const FORMAT_VERSION: u16 = 1;
/// Envelope header length.
pub const HEADER_LEN: usize = 6;

fn options(limit: usize) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(limit as u64)
        .reject_trailing_bytes()
}

fn encode<T: Serialize>(magic: [u8; 4], what: &'static str, value: &T) -> VerifyResult<Vec<u8>> {
    let payload = options(usize::MAX)
        .serialize(value)
        .map_err(|e| VerifyError::Decode {
            what,
            reason: e.to_string(),
        })?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&magic);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

fn decode<T: DeserializeOwned>(
    magic: [u8; 4],
    what: &'static str,
    bytes: &[u8],
    max_len: usize,
) -> VerifyResult<T> {
    if bytes.len() > max_len {
        return Err(VerifyError::TooLarge {
            what,
            len: bytes.len(),
            limit: max_len,
        });
    }
    if bytes.len() < HEADER_LEN {
        return Err(VerifyError::Truncated(what));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);
    if header[..4] != magic {
        return Err(VerifyError::BadMagic {
            what,
            found: hex::encode(&header[..4]),
        });
    }
    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != FORMAT_VERSION {
        return Err(VerifyError::UnsupportedVersion { what, version });
    }
    options(max_len)
        .deserialize(payload)
        .map_err(|e| VerifyError::Decode {
            what,
            reason: e.to_string(),
        })
}

/// Encode a proof envelope.
///
/// # Errors
/// Only if serialization itself fails, which the proof types never do.
pub fn encode_proof(proof: &StarkProof) -> VerifyResult<Vec<u8>> {
    encode(PROOF_MAGIC, "proof", proof)
}

/// Decode a proof envelope of at most `max_len` bytes.
///
/// # Errors
/// Structural [`VerifyError`]s for every malformed input.
pub fn decode_proof(bytes: &[u8], max_len: usize) -> VerifyResult<StarkProof> {
    decode(PROOF_MAGIC, "proof", bytes, max_len)
}

/// Encode a verification-key envelope.
///
/// # Errors
/// Only if serialization itself fails.
pub fn encode_vk(vk: &VerificationKey) -> VerifyResult<Vec<u8>> {
    encode(VK_MAGIC, "verification key", vk)
}

/// Decode a verification-key envelope of at most `max_len` bytes.
///
/// The key is not validated here.
///
/// # Errors
/// Structural [`VerifyError`]s for every malformed input.
pub fn decode_vk(bytes: &[u8], max_len: usize) -> VerifyResult<VerificationKey> {
    decode(VK_MAGIC, "verification key", bytes, max_len)
}

/// Public inputs as concatenated canonical 8-byte LE field elements.
#[must_use]
pub fn encode_public_inputs(values: &[F]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Inverse of [`encode_public_inputs`].
///
/// # Errors
/// [`VerifyError::Decode`] when the length is not a multiple of 8 or a value
/// is not canonical.
pub fn decode_public_inputs(bytes: &[u8]) -> VerifyResult<Vec<F>> {
    const WHAT: &str = "public inputs";
    if bytes.len() % 8 != 0 {
        return Err(VerifyError::Decode {
            what: WHAT,
            reason: format!("length {} is not a multiple of 8", bytes.len()),
        });
    }
    bytes
        .chunks_exact(8)
        .enumerate()
        .map(|(i, chunk)| {
            let mut le = [0u8; 8];
            le.copy_from_slice(chunk);
            F::from_le_bytes(le).ok_or_else(|| VerifyError::Decode {
                what: WHAT,
                reason: format!("element {i} is not canonical"),
            })
        })
        .collect()
}
