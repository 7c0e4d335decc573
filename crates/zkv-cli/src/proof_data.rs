//! Fixture files: a proof, its public inputs and key as hex strings.
//!
//! JSON or CBOR, chosen by file extension (case-insensitive). Unknown
//! extensions are rejected on read and default to JSON on write.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::ensure_parent_dir;

/// On-disk fixture record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofData {
    /// Proof envelope, `0x`-prefixed hex.
    pub proof: String,
    /// Public inputs (8-byte LE words), `0x`-prefixed hex.
    pub public_inputs: String,
    /// Verification-key digest, `0x`-prefixed hex.
    pub vkey_hash: String,
    /// Verification-key envelope, `0x`-prefixed hex.
    pub vkey: String,
    /// Producer version.
    pub version: String,
    /// Proof system.
    pub mode: String,
}

/// Bytes carried by a [`ProofData`].
#[derive(Clone, Debug)]
pub struct DecodedProofData {
    pub proof: Vec<u8>,
    pub public_inputs: Vec<u8>,
    pub vkey_hash: Vec<u8>,
    pub vkey: Vec<u8>,
}

pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn from_hex(field: &str, s: &str) -> Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).with_context(|| format!("field {field} is not valid hex"))
}

impl ProofData {
    pub fn decode(&self) -> Result<DecodedProofData> {
        Ok(DecodedProofData {
            proof: from_hex("proof", &self.proof)?,
            public_inputs: from_hex("public_inputs", &self.public_inputs)?,
            vkey_hash: from_hex("vkey_hash", &self.vkey_hash)?,
            vkey: from_hex("vkey", &self.vkey)?,
        })
    }
}

fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Read a fixture from `.json` or `.cbor`.
pub fn read_auto(path: &Path) -> Result<ProofData> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = BufReader::new(f);
    match ext_lower(path).as_deref() {
        Some("json") => serde_json::from_reader(rdr).context("deserialize JSON fixture"),
        Some("cbor") => ciborium::de::from_reader(&mut rdr).context("deserialize CBOR fixture"),
        _ => Err(anyhow!(
            "unknown fixture extension for {} (use .json or .cbor)",
            path.display()
        )),
    }
}

/// Write a fixture as CBOR for `.cbor`, pretty JSON otherwise.
pub fn write_auto(path: &Path, data: &ProofData) -> Result<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    if ext_lower(path).as_deref() == Some("cbor") {
        ciborium::ser::into_writer(data, &mut w).context("serialize CBOR fixture")?;
    } else {
        serde_json::to_writer_pretty(w, data).context("serialize JSON fixture")?;
    }
    Ok(())
}
