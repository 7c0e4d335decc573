//! Transcript replay properties: identical histories agree, reordered or
//! altered histories diverge.

use proptest::prelude::*;
use zkv_crypto::{Blake3Transcript, Transcript};
use zkv_ffts::GOLDILOCKS;

const DOMAIN: &str = "zkv-test/v1";

fn replay(ops: &[(String, Vec<u8>)]) -> Blake3Transcript {
    let mut t = Blake3Transcript::new(DOMAIN);
    for (label, bytes) in ops {
        t.absorb(label, bytes);
    }
    t
}

#[test]
fn field_challenges_are_canonical_and_repeatable() {
    let mut a = Blake3Transcript::new(DOMAIN);
    let mut b = Blake3Transcript::new(DOMAIN);
    a.absorb_u64("n", 8);
    b.absorb_u64("n", 8);
    let xs = a.challenge_field_elements("alpha", 32);
    let ys = b.challenge_field_elements("alpha", 32);
    assert_eq!(xs, ys);
    assert!(xs.iter().all(|x| x.as_u64() < GOLDILOCKS));
    assert_eq!(a.challenge_field_element("z"), b.challenge_field_element("z"));
}

#[test]
fn label_boundaries_are_bound() {
    // Same concatenated bytes split differently between label and payload.
    let mut a = Blake3Transcript::new(DOMAIN);
    let mut b = Blake3Transcript::new(DOMAIN);
    a.absorb("ab", b"c");
    b.absorb("a", b"bc");
    assert_ne!(a.challenge_bytes("x", 32), b.challenge_bytes("x", 32));
}

proptest! {
    #[test]
    fn identical_histories_agree(
        ops in prop::collection::vec(("[a-z]{1,8}", prop::collection::vec(any::<u8>(), 0..32)), 0..8)
    ) {
        let mut a = replay(&ops);
        let mut b = replay(&ops);
        prop_assert_eq!(a.challenge_bytes("c", 32), b.challenge_bytes("c", 32));
        prop_assert_eq!(
            a.challenge_indices("q", 16, 1 << 12),
            b.challenge_indices("q", 16, 1 << 12)
        );
    }

    #[test]
    fn swapping_two_absorbs_changes_challenges(
        x in prop::collection::vec(any::<u8>(), 1..32),
        y in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        prop_assume!(x != y);
        let mut a = Blake3Transcript::new(DOMAIN);
        a.absorb("m", &x);
        a.absorb("m", &y);
        let mut b = Blake3Transcript::new(DOMAIN);
        b.absorb("m", &y);
        b.absorb("m", &x);
        prop_assert_ne!(a.challenge_field_element("c"), b.challenge_field_element("c"));
    }
}
