//! Opening round-trips and tamper detection for `MerkleTree` / `verify_open`.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use zkv_merkle::{hash_leaf, verify_open, Digest, MerkleError, MerkleTree};

fn rows(n: usize) -> Vec<Vec<[u8; 8]>> {
    (0..n as u64)
        .map(|i| vec![i.to_le_bytes(), (i * i + 3).to_le_bytes()])
        .collect()
}

#[test]
fn every_leaf_opens() {
    let rs = rows(32);
    let tree = MerkleTree::from_rows("trace", &rs).unwrap();
    assert_eq!(tree.depth(), 5);
    for (i, r) in rs.iter().enumerate() {
        let path = tree.open(i).unwrap();
        let leaf = hash_leaf("trace", r);
        assert_eq!(verify_open(&tree.root(), i, &leaf, &path, 5), Ok(true));
    }
}

#[test]
fn wrong_index_or_leaf_is_a_mismatch() {
    let rs = rows(16);
    let tree = MerkleTree::from_rows("fri", &rs).unwrap();
    let path = tree.open(3).unwrap();
    let leaf = hash_leaf("fri", &rs[3]);
    assert_eq!(verify_open(&tree.root(), 2, &leaf, &path, 4), Ok(false));

    let other = hash_leaf("fri", &rs[4]);
    assert_eq!(verify_open(&tree.root(), 3, &other, &path, 4), Ok(false));

    let relabeled = hash_leaf("trace", &rs[3]);
    assert_eq!(verify_open(&tree.root(), 3, &relabeled, &path, 4), Ok(false));
}

#[test]
fn structural_errors_are_distinguished() {
    let rs = rows(8);
    let tree = MerkleTree::from_rows("t", &rs).unwrap();
    let path = tree.open(1).unwrap();
    let leaf = hash_leaf("t", &rs[1]);

    assert_eq!(
        verify_open(&tree.root(), 1, &leaf, &path[..2], 3),
        Err(MerkleError::PathLength { expected: 3, got: 2 })
    );
    assert_eq!(
        verify_open(&tree.root(), 8, &leaf, &path, 3),
        Err(MerkleError::IndexOutOfRange { index: 8, depth: 3 })
    );
    assert!(tree.open(8).is_err());
}

proptest! {
    #[test]
    fn flipping_any_path_bit_rejects(idx in 0usize..16, level in 0usize..4, byte in 0usize..32, bit in 0u8..8) {
        let rs = rows(16);
        let tree = MerkleTree::from_rows("t", &rs).unwrap();
        let mut path: Vec<Digest> = tree.open(idx).unwrap();
        path[level][byte] ^= 1 << bit;
        let leaf = hash_leaf("t", &rs[idx]);
        prop_assert_eq!(verify_open(&tree.root(), idx, &leaf, &path, 4), Ok(false));
    }
}
