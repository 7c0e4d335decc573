//! Any single corruption of an honest proof, key or envelope is rejected,
//! and the rejection carries the expected category.

mod common;

use common::{fixture, small_fri};
use zkv_prover::fixtures;
use zkv_stark::codec::{decode_proof, decode_vk, HEADER_LEN};
use zkv_stark::params::DEFAULT_MAX_PROOF_BYTES;
use zkv_stark::{verify, Felt, RejectKind, VerifyError};

fn one() -> Felt {
    Felt::one()
}

fn kind_of(proof: &zkv_stark::StarkProof, vk: &zkv_stark::VerificationKey) -> RejectKind {
    verify(proof, vk).expect_err("tampered proof verified").kind()
}

/* ------------------------------ Proof fields ------------------------------- */

#[test]
fn public_input_change_rejects() {
    let fx = fixture("fibonacci");
    let mut p = fx.proof.clone();
    p.public_inputs[2] += one();
    assert!(verify(&p, &fx.vk).is_err());
}

#[test]
fn root_byte_flips_reject() {
    let fx = fixture("counter");
    for bit in [0u8, 3, 7] {
        let mut p = fx.proof.clone();
        p.trace_root[5] ^= 1 << bit;
        assert!(verify(&p, &fx.vk).is_err());

        let mut p = fx.proof.clone();
        p.composition_root[31] ^= 1 << bit;
        assert!(verify(&p, &fx.vk).is_err());

        let mut p = fx.proof.clone();
        p.fri.layer_roots[0][0] ^= 1 << bit;
        assert!(verify(&p, &fx.vk).is_err());
    }
}

#[test]
fn ood_composition_value_is_checked() {
    let fx = fixture("square");
    let mut p = fx.proof.clone();
    p.ood.composition_z[0] += one();
    assert_eq!(verify(&p, &fx.vk), Err(VerifyError::OodMismatch));
}

#[test]
fn opened_row_value_breaks_commitment() {
    let fx = fixture("fibonacci");
    let mut p = fx.proof.clone();
    p.queries[0].trace[1].values[1] += one();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::CommitmentMismatch);

    let mut p = fx.proof.clone();
    p.queries[2].composition[0].values[0] += one();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::CommitmentMismatch);

    let fx = fixture("counter");
    let mut p = fx.proof.clone();
    p.queries[1].fixed[0].values[0] += one();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::CommitmentMismatch);
}

#[test]
fn fri_pair_value_breaks_commitment() {
    let fx = fixture("cube");
    let mut p = fx.proof.clone();
    p.queries[0].fri_layers[1].pair[1] += one();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::CommitmentMismatch);
}

#[test]
fn oversized_remainder_is_a_degree_violation() {
    let fx = fixture("fibonacci");
    let mut p = fx.proof.clone();
    p.fri.remainder.push(one());
    let err = verify(&p, &fx.vk).unwrap_err();
    assert_eq!(err.kind(), RejectKind::DegreeBound);
    assert!(matches!(err, VerifyError::RemainderDegree { len: 3, max: 2 }));
}

#[test]
fn remainder_coefficient_change_rejects() {
    let fx = fixture("square");
    let mut p = fx.proof.clone();
    p.fri.remainder[0] += one();
    assert!(verify(&p, &fx.vk).is_err());
}

#[test]
fn structural_mismatches() {
    let fx = fixture("fibonacci");

    let mut p = fx.proof.clone();
    p.fri.layer_roots.pop();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::Structural);

    let mut p = fx.proof.clone();
    p.queries.pop();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::Structural);

    let mut p = fx.proof.clone();
    p.ood.trace_gz.push(one());
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::Structural);

    let mut p = fx.proof.clone();
    p.queries[4].trace[0].path.pop();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::Structural);

    let mut p = fx.proof.clone();
    p.queries[0].fri_layers.pop();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::Structural);

    let mut p = fx.proof.clone();
    p.public_inputs.pop();
    assert_eq!(kind_of(&p, &fx.vk), RejectKind::Structural);
}

/* ---------------------------------- Keys ----------------------------------- */

#[test]
fn proof_does_not_verify_under_another_key() {
    let fx = fixture("square");

    let longer = fixtures::square_chain(5, small_fri()).unwrap();
    assert!(verify(&fx.proof, &longer.vk).is_err());

    let cube = fixture("cube");
    assert!(verify(&fx.proof, &cube.vk).is_err());

    let mut vk = fx.vk.clone();
    vk.fixed_root[0] ^= 1;
    assert!(verify(&fx.proof, &vk).is_err());

    let mut vk = fx.vk.clone();
    vk.fri.num_queries += 1;
    assert_eq!(kind_of(&fx.proof, &vk), RejectKind::Structural);
}

#[test]
fn invalid_key_is_structural() {
    let fx = fixture("fibonacci");
    let mut vk = fx.vk.clone();
    vk.fri.log_blowup = 0;
    assert!(matches!(verify(&fx.proof, &vk), Err(VerifyError::InvalidKey(_))));

    let mut vk = fx.vk.clone();
    vk.fri.log_remainder_len = vk.log_trace_len;
    assert!(matches!(verify(&fx.proof, &vk), Err(VerifyError::InvalidKey(_))));
}

/* --------------------------------- Envelope -------------------------------- */

#[test]
fn corrupted_trace_root_bytes_reject() {
    let fx = fixture("fibonacci");
    let mut bytes = fx.proof_bytes().unwrap();
    let at = bytes
        .windows(32)
        .position(|w| w == fx.proof.trace_root)
        .unwrap();
    bytes[at + 10] ^= 0x40;
    let p = decode_proof(&bytes, DEFAULT_MAX_PROOF_BYTES).unwrap();
    assert_ne!(p.trace_root, fx.proof.trace_root);
    assert!(verify(&p, &fx.vk).is_err());
}

#[test]
fn malformed_envelopes_are_structural() {
    let fx = fixture("counter");
    let bytes = fx.proof_bytes().unwrap();

    let mut magic = bytes.clone();
    magic[0] = b'X';
    assert!(matches!(
        decode_proof(&magic, DEFAULT_MAX_PROOF_BYTES),
        Err(VerifyError::BadMagic { .. })
    ));

    let mut version = bytes.clone();
    version[4] = 2;
    assert!(matches!(
        decode_proof(&version, DEFAULT_MAX_PROOF_BYTES),
        Err(VerifyError::UnsupportedVersion { version: 2, .. })
    ));

    let cut = &bytes[..bytes.len() - 1];
    assert_eq!(
        decode_proof(cut, DEFAULT_MAX_PROOF_BYTES).unwrap_err().kind(),
        RejectKind::Structural
    );

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(matches!(
        decode_proof(&trailing, DEFAULT_MAX_PROOF_BYTES),
        Err(VerifyError::Decode { .. })
    ));

    assert!(matches!(
        decode_proof(&bytes, bytes.len() - 1),
        Err(VerifyError::TooLarge { .. })
    ));

    // First public input (after the u64 length prefix) set to a value >= p.
    let mut non_canonical = bytes.clone();
    let at = HEADER_LEN + 8;
    non_canonical[at..at + 8].copy_from_slice(&u64::MAX.to_le_bytes());
    assert!(matches!(
        decode_proof(&non_canonical, DEFAULT_MAX_PROOF_BYTES),
        Err(VerifyError::Decode { .. })
    ));

    // A proof envelope is not a key envelope.
    assert!(matches!(
        decode_vk(&bytes, DEFAULT_MAX_PROOF_BYTES),
        Err(VerifyError::BadMagic { .. })
    ));
}
