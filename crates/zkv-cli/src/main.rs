// crates/zkv-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

mod proof_data;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zkv_prover::fixtures;
use zkv_stark::codec::{decode_proof, decode_vk};
use zkv_stark::FriOptions;
use zkv_verifier::{StarkVerifier, VerifierConfig};

use crate::proof_data::{to_hex, ProofData};

#[derive(Parser, Debug)]
#[command(
    name = "zkv-cli",
    about = "zkv STARK verifier CLI",
    long_about = "zkv STARK verifier CLI.\n\nVerify binary proofs against verification keys, inspect their contents, and generate or check toy fixtures.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Verify a binary proof against a binary verification key
    Verify {
        /// Proof envelope
        #[arg(long, default_value = "proof.bin")]
        proof: PathBuf,

        /// Verification-key envelope
        #[arg(long, default_value = "vk.bin")]
        vk: PathBuf,

        /// Optional public inputs (8-byte LE words) the proof must carry
        #[arg(long)]
        public_inputs: Option<PathBuf>,

        /// Maximum accepted proof size in bytes
        #[arg(long)]
        max_proof_bytes: Option<usize>,

        /// Check queries on a single thread
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },

    /// Print the structure of a proof (and optionally its key)
    Inspect {
        /// Proof envelope
        #[arg(long)]
        proof: PathBuf,

        /// Verification-key envelope
        #[arg(long)]
        vk: Option<PathBuf>,
    },

    /// Generate a toy proof with the reference prover
    Fixture {
        /// Constraint system
        #[arg(value_enum, long, default_value_t = AirOpt::Fibonacci)]
        air: AirOpt,

        /// log2 of the trace length
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(2..=16))]
        log_trace_len: u32,

        /// log2 of the LDE blowup
        #[arg(long, default_value_t = 2)]
        log_blowup: u32,

        /// Number of FRI queries
        #[arg(long, default_value_t = 24)]
        num_queries: u32,

        /// log2 of the FRI remainder length
        #[arg(long, default_value_t = 1)]
        log_remainder_len: u32,

        /// Output fixture (CBOR/JSON)
        #[arg(long, default_value = "fixture.json")]
        out: PathBuf,

        /// Also write the raw proof envelope here
        #[arg(long)]
        proof_bin: Option<PathBuf>,

        /// Also write the raw verification-key envelope here
        #[arg(long)]
        vk_bin: Option<PathBuf>,
    },

    /// Check a fixture file: key digest, public inputs and proof
    VerifyFixture {
        /// Fixture (CBOR/JSON)
        #[arg(long, default_value = "fixture.json")]
        fixture: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AirOpt {
    Fibonacci,
    Counter,
    Square,
    Cube,
}

impl AirOpt {
    const fn fixture_name(self) -> &'static str {
        match self {
            Self::Fibonacci => "fibonacci",
            Self::Counter => "counter",
            Self::Square => "square",
            Self::Cube => "cube",
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    zkv_verifier::initialize();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Verify {
            proof,
            vk,
            public_inputs,
            max_proof_bytes,
            sequential,
        } => verify(&proof, &vk, public_inputs.as_deref(), max_proof_bytes, sequential),

        Cmd::Inspect { proof, vk } => inspect(&proof, vk.as_deref()),

        Cmd::Fixture {
            air,
            log_trace_len,
            log_blowup,
            num_queries,
            log_remainder_len,
            out,
            proof_bin,
            vk_bin,
        } => {
            let fri = FriOptions {
                log_blowup,
                num_queries,
                log_remainder_len,
            };
            fixture(air, log_trace_len, fri, &out, proof_bin.as_deref(), vk_bin.as_deref())
        }

        Cmd::VerifyFixture { fixture } => verify_fixture(&fixture),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Ensure the parent directory for a file exists.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

fn read_bytes(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {what} from {}", path.display()))
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn verify(
    proof: &Path,
    vk: &Path,
    public_inputs: Option<&Path>,
    max_proof_bytes: Option<usize>,
    sequential: bool,
) -> Result<()> {
    let proof_bytes = read_bytes(proof, "proof")?;
    let vk_bytes = read_bytes(vk, "verification key")?;
    println!("Proof size: {} bytes", proof_bytes.len());
    println!("VK size: {} bytes", vk_bytes.len());

    let mut config = VerifierConfig::default().with_parallel(!sequential);
    if let Some(n) = max_proof_bytes {
        config = config.with_max_proof_bytes(n);
    }
    let verifier = StarkVerifier::new(config);
    info!(proof=%proof.display(), vk=%vk.display(), sequential, "verifying proof");

    let start = Instant::now();
    let res = match public_inputs {
        Some(path) => {
            let pi = read_bytes(path, "public inputs")?;
            verifier.verify_with_public_inputs_detailed(&proof_bytes, &pi, &vk_bytes)
        }
        None => verifier.verify_detailed(&proof_bytes, &vk_bytes),
    };
    let elapsed = start.elapsed();

    match res {
        Ok(()) => {
            println!("Proof verification: SUCCESS");
            println!("Verification time: {elapsed:?}");
            Ok(())
        }
        Err(e) => {
            println!("Proof verification: FAILED ({})", e.kind());
            println!("Verification time: {elapsed:?}");
            bail!("proof rejected: {e}")
        }
    }
}

fn inspect(proof: &Path, vk: Option<&Path>) -> Result<()> {
    let bytes = read_bytes(proof, "proof")?;
    let p = decode_proof(&bytes, bytes.len()).context("decoding proof")?;
    println!("proof: {} ({} bytes)", proof.display(), bytes.len());
    println!("  public inputs: {}", p.public_inputs.len());
    for (i, v) in p.public_inputs.iter().enumerate() {
        println!("    [{i}] {}", v.as_u64());
    }
    println!("  trace root:        {}", hex::encode(p.trace_root));
    println!("  composition root:  {}", hex::encode(p.composition_root));
    println!(
        "  OOD frame: {} trace, {} fixed, {} composition columns",
        p.ood.trace_z.len(),
        p.ood.fixed_z.len(),
        p.ood.composition_z.len()
    );
    println!(
        "  FRI: {} committed layers, remainder of {} coefficients",
        p.fri.layer_roots.len(),
        p.fri.remainder.len()
    );
    println!("  queries: {}", p.queries.len());

    if let Some(path) = vk {
        let bytes = read_bytes(path, "verification key")?;
        let k = decode_vk(&bytes, bytes.len()).context("decoding verification key")?;
        let valid = k.validate();
        let budget = k.budget();
        println!("vk: {} ({} bytes)", path.display(), bytes.len());
        println!("  digest:   0x{}", k.digest_hex());
        println!("  air:      {} ({} public inputs)", k.air.name, k.air.num_public);
        println!(
            "  trace:    n = 2^{}, {} witness + {} fixed columns",
            k.log_trace_len, k.trace_width, k.fixed_width
        );
        println!(
            "  fri:      blowup 2^{}, {} queries, remainder 2^{}, {} folds",
            k.fri.log_blowup,
            k.fri.num_queries,
            k.fri.log_remainder_len,
            k.num_folds()
        );
        match valid {
            Ok(()) => println!(
                "  budget:   <= {} proof bytes, <= {} hash calls",
                budget.max_proof_bytes, budget.hash_invocations
            ),
            Err(e) => println!("  invalid:  {e}"),
        }
    }
    Ok(())
}

fn fixture(
    air: AirOpt,
    log_trace_len: u32,
    fri: FriOptions,
    out: &Path,
    proof_bin: Option<&Path>,
    vk_bin: Option<&Path>,
) -> Result<()> {
    info!(?air, log_trace_len, ?fri, out=%out.display(), "generating fixture");
    let start = Instant::now();
    let fx = fixtures::by_name(air.fixture_name(), log_trace_len, fri)
        .with_context(|| format!("proving the {air:?} fixture"))?;
    let proof = fx.proof_bytes()?;
    let vk = fx.vk_bytes()?;

    let data = ProofData {
        proof: to_hex(&proof),
        public_inputs: to_hex(&fx.public_input_bytes()),
        vkey_hash: to_hex(&fx.vk.digest()),
        vkey: to_hex(&vk),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: "stark".to_string(),
    };
    proof_data::write_auto(out, &data)
        .with_context(|| format!("writing fixture to {}", out.display()))?;
    if let Some(path) = proof_bin {
        write_bytes(path, &proof)?;
    }
    if let Some(path) = vk_bin {
        write_bytes(path, &vk)?;
    }

    println!(
        "Fixture {:?}: n = 2^{log_trace_len}, proof {} bytes, vk {} bytes ({:?}) → {}",
        air,
        proof.len(),
        vk.len(),
        start.elapsed(),
        out.display()
    );
    println!("vkey_hash: {}", data.vkey_hash);
    Ok(())
}

fn verify_fixture(path: &Path) -> Result<()> {
    info!(fixture=%path.display(), "verifying fixture");
    let data = proof_data::read_auto(path)?;
    ensure!(data.mode == "stark", "unsupported proof mode {:?}", data.mode);
    let raw = data.decode()?;

    let vk = decode_vk(&raw.vkey, raw.vkey.len()).context("decoding verification key")?;
    ensure!(
        raw.vkey_hash == vk.digest(),
        "vkey_hash {} does not match the key digest 0x{}",
        data.vkey_hash,
        vk.digest_hex()
    );

    let start = Instant::now();
    StarkVerifier::default()
        .verify_with_public_inputs_detailed(&raw.proof, &raw.public_inputs, &raw.vkey)
        .with_context(|| format!("fixture {} rejected", path.display()))?;
    println!("OK: fixture {} verified in {:?}", path.display(), start.elapsed());
    Ok(())
}
