//! Ready-made statements over the toy AIRs in [`zkv_stark::air::library`].

use anyhow::{bail, Result};
use zkv_ffts::Goldilocks as F;
use zkv_stark::air::library;
use zkv_stark::codec;
use zkv_stark::{FriOptions, StarkProof, VerificationKey};

use crate::{prove, setup};

/// A key, a proof and the public inputs it was produced for.
#[derive(Clone, Debug)]
pub struct Fixture {
    /// Verification key.
    pub vk: VerificationKey,
    /// Proof of the statement.
    pub proof: StarkProof,
    /// Public inputs (also embedded in the proof).
    pub public_inputs: Vec<F>,
}

impl Fixture {
    /// Proof in its versioned envelope.
    ///
    /// # Errors
    /// If serialization fails.
    pub fn proof_bytes(&self) -> Result<Vec<u8>> {
        Ok(codec::encode_proof(&self.proof)?)
    }

    /// Key in its versioned envelope.
    ///
    /// # Errors
    /// If serialization fails.
    pub fn vk_bytes(&self) -> Result<Vec<u8>> {
        Ok(codec::encode_vk(&self.vk)?)
    }

    /// Public inputs as 8-byte little-endian words.
    #[must_use]
    pub fn public_input_bytes(&self) -> Vec<u8> {
        codec::encode_public_inputs(&self.public_inputs)
    }
}

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 4] = ["fibonacci", "counter", "square", "cube"];

/// Build a fixture by short name.
///
/// # Errors
/// Unknown name, or proving failed.
pub fn by_name(name: &str, log_trace_len: u32, fri: FriOptions) -> Result<Fixture> {
    match name {
        "fibonacci" => fibonacci(log_trace_len, fri),
        "counter" => counter_with_fixed_step(log_trace_len, fri),
        "square" => square_chain(log_trace_len, fri),
        "cube" => cube_chain(log_trace_len, fri),
        other => bail!("unknown fixture {other:?} (expected one of {NAMES:?})"),
    }
}

/// Fibonacci from `(1, 1)`.
///
/// # Errors
/// If the parameters are out of range.
pub fn fibonacci(log_trace_len: u32, fri: FriOptions) -> Result<Fixture> {
    let n = 1usize << log_trace_len;
    let (mut a, mut b) = (vec![F::one(); n], vec![F::one(); n]);
    for i in 1..n {
        a[i] = b[i - 1];
        b[i] = a[i - 1] + b[i - 1];
    }
    let public = vec![a[0], b[0], b[n - 1]];
    let (pk, vk) = setup(library::fibonacci(), 2, Vec::new(), log_trace_len, fri)?;
    let proof = prove(&pk, &[a, b], &public)?;
    Ok(Fixture {
        vk,
        proof,
        public_inputs: public,
    })
}

/// Counter starting at 5, stepped by the fixed column `s[i] = i + 1`.
///
/// # Errors
/// If the parameters are out of range.
pub fn counter_with_fixed_step(log_trace_len: u32, fri: FriOptions) -> Result<Fixture> {
    let n = 1usize << log_trace_len;
    let step: Vec<F> = (1..=n as u64).map(F::from_u64).collect();
    let mut x = vec![F::from_u64(5); n];
    for i in 1..n {
        x[i] = x[i - 1] + step[i - 1];
    }
    let public = vec![x[0], x[n - 1]];
    let (pk, vk) = setup(library::counter_with_fixed_step(), 1, vec![step], log_trace_len, fri)?;
    let proof = prove(&pk, &[x], &public)?;
    Ok(Fixture {
        vk,
        proof,
        public_inputs: public,
    })
}

fn power_chain(air: zkv_stark::Air, start: u64, exp: u64, log_trace_len: u32, fri: FriOptions) -> Result<Fixture> {
    let n = 1usize << log_trace_len;
    let mut x = vec![F::from_u64(start); n];
    for i in 1..n {
        x[i] = x[i - 1].pow(exp);
    }
    let public = vec![x[0], x[n - 1]];
    let (pk, vk) = setup(air, 1, Vec::new(), log_trace_len, fri)?;
    let proof = prove(&pk, &[x], &public)?;
    Ok(Fixture {
        vk,
        proof,
        public_inputs: public,
    })
}

/// Repeated squaring from 3.
///
/// # Errors
/// If the parameters are out of range.
pub fn square_chain(log_trace_len: u32, fri: FriOptions) -> Result<Fixture> {
    power_chain(library::square_chain(), 3, 2, log_trace_len, fri)
}

/// Repeated cubing from 2. Needs `log_blowup >= 1` for its width-2 composition.
///
/// # Errors
/// If the parameters are out of range.
pub fn cube_chain(log_trace_len: u32, fri: FriOptions) -> Result<Fixture> {
    power_chain(library::cube_chain(), 2, 3, log_trace_len, fri)
}
