//! Fiat–Shamir substrate: a BLAKE3 transcript with an absorb/challenge API.
//!
//! Every absorb binds the label and payload length; every challenge binds its
//! label and advances the state, so two transcripts agree on a challenge only
//! if they agree on the whole ordered history before it.
//!
//! Field and index challenges are derived from raw challenge bytes by the
//! provided methods of [`Transcript`]:
//! - a field element takes 16 bytes read as a little-endian `u128`, reduced
//!   modulo `p` (bias below `2^-64`);
//! - an index takes 8 bytes read as a little-endian `u64`, masked for
//!   power-of-two domains and reduced modulo the size otherwise.

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
#![allow(clippy::cast_possible_truncation)]

use blake3::Hasher;
use zkv_ffts::Goldilocks as F;

/// Fixed domain prefix to seed transcripts.
const TRANSCRIPT_PREFIX: &[u8] = b"zkv.transcript.v1";

/// Bytes consumed per field-element challenge.
pub const FIELD_CHALLENGE_BYTES: usize = 16;

/// Bytes consumed per index challenge.
pub const INDEX_CHALLENGE_BYTES: usize = 8;

/// Transcript interface shared by the verifier and the fixture prover.
pub trait Transcript {
    /// Add raw bytes under a label (domain-separated).
    fn absorb(&mut self, label: &str, bytes: &[u8]);

    /// Convenience: absorb an unsigned 64-bit value (LE).
    fn absorb_u64(&mut self, label: &str, x: u64) {
        self.absorb(label, &x.to_le_bytes());
    }

    /// Convenience: absorb a slice of field elements as canonical LE bytes.
    fn absorb_field_elements(&mut self, label: &str, xs: &[F]) {
        let bytes: Vec<u8> = xs.iter().flat_map(|x| x.to_le_bytes()).collect();
        self.absorb(label, &bytes);
    }

    /// Squeeze `n` bytes as a challenge under `label`.
    #[must_use]
    fn challenge_bytes(&mut self, label: &str, n: usize) -> Vec<u8>;

    /// One field element challenge.
    #[must_use]
    fn challenge_field_element(&mut self, label: &str) -> F {
        let bytes = self.challenge_bytes(label, FIELD_CHALLENGE_BYTES);
        field_from_bytes(&bytes)
    }

    /// `k` field element challenges drawn from a single squeeze.
    #[must_use]
    fn challenge_field_elements(&mut self, label: &str, k: usize) -> Vec<F> {
        let bytes = self.challenge_bytes(label, k * FIELD_CHALLENGE_BYTES);
        bytes
            .chunks_exact(FIELD_CHALLENGE_BYTES)
            .map(field_from_bytes)
            .collect()
    }

    /// `count` indices in `[0, domain_size)`.
    ///
    /// Returns an empty vector when `domain_size == 0`.
    #[must_use]
    fn challenge_indices(&mut self, label: &str, count: usize, domain_size: usize) -> Vec<usize> {
        if domain_size == 0 {
            return Vec::new();
        }
        let bytes = self.challenge_bytes(label, count * INDEX_CHALLENGE_BYTES);
        bytes
            .chunks_exact(INDEX_CHALLENGE_BYTES)
            .map(|chunk| index_from_bytes(chunk, domain_size))
            .collect()
    }
}

fn field_from_bytes(chunk: &[u8]) -> F {
    let mut le = [0u8; FIELD_CHALLENGE_BYTES];
    le.copy_from_slice(chunk);
    F::from_u128(u128::from_le_bytes(le))
}

fn index_from_bytes(chunk: &[u8], domain_size: usize) -> usize {
    let mut le = [0u8; INDEX_CHALLENGE_BYTES];
    le.copy_from_slice(chunk);
    let raw = u64::from_le_bytes(le);
    let size = domain_size as u64;
    let idx = if size.is_power_of_two() {
        raw & (size - 1)
    } else {
        raw % size
    };
    idx as usize
}

/// Operation tags framing every transcript update.
#[derive(Copy, Clone)]
#[repr(u8)]
enum Op {
    Domain = 0,
    Absorb = 1,
    Squeeze = 2,
    Ratchet = 3,
}

/// `op ‖ len(label) ‖ label ‖ len`, all lengths as u64 LE.
fn frame(h: &mut Hasher, op: Op, label: &[u8], len: usize) {
    h.update(&[op as u8]);
    h.update(&(label.len() as u64).to_le_bytes());
    h.update(label);
    h.update(&(len as u64).to_le_bytes());
}

/// BLAKE3 transcript.
///
/// Absorbs extend a running hasher. A challenge reads the XOF of a forked
/// copy of that state, then ratchets the running state with the label, the
/// output length and a squeeze counter.
#[derive(Clone, Debug)]
pub struct Blake3Transcript {
    state: Hasher,
    squeezes: u64,
}

impl Blake3Transcript {
    /// Fresh transcript bound to `domain_sep`.
    #[must_use]
    pub fn new(domain_sep: &str) -> Self {
        let mut state = Hasher::new();
        state.update(TRANSCRIPT_PREFIX);
        frame(&mut state, Op::Domain, domain_sep.as_bytes(), 0);
        Self { state, squeezes: 0 }
    }
}

impl Transcript for Blake3Transcript {
    fn absorb(&mut self, label: &str, bytes: &[u8]) {
        frame(&mut self.state, Op::Absorb, label.as_bytes(), bytes.len());
        self.state.update(bytes);
    }

    fn challenge_bytes(&mut self, label: &str, n: usize) -> Vec<u8> {
        let mut fork = self.state.clone();
        frame(&mut fork, Op::Squeeze, label.as_bytes(), n);
        let mut out = vec![0u8; n];
        fork.finalize_xof().fill(&mut out);

        frame(&mut self.state, Op::Ratchet, label.as_bytes(), n);
        self.state.update(&self.squeezes.to_le_bytes());
        self.squeezes += 1;
        out
    }
}
