//! BLAKE3 Merkle commitments over rows of field elements.
//!
//! Leaves are the domain-separated hash of one row (each element as its
//! canonical 8-byte little-endian encoding); inner nodes hash
//! `NODE_TAG || left || right`. Trees always have a power-of-two number of
//! leaves, so an authentication path for a tree of depth `d` has exactly `d`
//! siblings, ordered bottom to top.
//!
//! [`verify_open`] separates *structural* failures (a path of the wrong
//! length, an index outside the tree), which are reported as
//! [`MerkleError`], from a plain mismatch, which is `Ok(false)`.

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
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation)]

use blake3::Hasher;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;

/// 32-byte BLAKE3 digest.
pub type Digest = [u8; 32];

/// Domain tag for leaf hashes.
pub const LEAF_TAG: &[u8] = b"zkv.merkle.leaf.v1";
/// Domain tag for inner-node hashes.
pub const NODE_TAG: &[u8] = b"zkv.merkle.node.v1";

/// Deepest tree accepted by [`verify_open`] and [`MerkleTree::from_leaves`].
pub const MAX_DEPTH: usize = 40;

/// Structural Merkle failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// The authentication path does not have one sibling per level.
    #[error("authentication path has {got} siblings, expected {expected}")]
    PathLength {
        /// Expected number of siblings (tree depth).
        expected: usize,
        /// Number of siblings supplied.
        got: usize,
    },
    /// The leaf index does not address a leaf of the tree.
    #[error("leaf index {index} out of range for depth {depth}")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Tree depth.
        depth: usize,
    },
    /// Trees must have a non-zero power-of-two number of leaves.
    #[error("cannot build a tree over {0} leaves (need a power of two)")]
    LeafCount(usize),
}

/// Hash one row of field elements (each 8 LE bytes) under `label`.
#[must_use]
pub fn hash_leaf(label: &str, elems_le: &[[u8; 8]]) -> Digest {
    let mut h = Hasher::new();
    h.update(LEAF_TAG);
    h.update(&(label.len() as u32).to_le_bytes());
    h.update(label.as_bytes());
    h.update(&(elems_le.len() as u32).to_le_bytes());
    for le in elems_le {
        h.update(le);
    }
    *h.finalize().as_bytes()
}

/// Hash two children into their parent.
#[inline]
#[must_use]
pub fn hash_node(left: &Digest, right: &Digest) -> Digest {
    let mut h = Hasher::new();
    h.update(NODE_TAG);
    h.update(left);
    h.update(right);
    *h.finalize().as_bytes()
}

/// Check an authentication path for `leaf` at `index` against `root`.
///
/// Sibling order follows the bits of `index`: a zero bit means the running
/// node is the left child at that level.
///
/// # Errors
/// [`MerkleError::PathLength`] if `path.len() != depth`,
/// [`MerkleError::IndexOutOfRange`] if `index >= 2^depth` (or `depth` is
/// beyond [`MAX_DEPTH`]).
pub fn verify_open(
    root: &Digest,
    index: usize,
    leaf: &Digest,
    path: &[Digest],
    depth: usize,
) -> Result<bool, MerkleError> {
    if path.len() != depth {
        return Err(MerkleError::PathLength {
            expected: depth,
            got: path.len(),
        });
    }
    if depth > MAX_DEPTH || (index >> depth) != 0 {
        return Err(MerkleError::IndexOutOfRange { index, depth });
    }
    let mut cur = *leaf;
    let mut idx = index;
    for sib in path {
        cur = if idx & 1 == 0 {
            hash_node(&cur, sib)
        } else {
            hash_node(sib, &cur)
        };
        idx >>= 1;
    }
    Ok(cur == *root)
}

/* ----------------------------- Prover-side tree ---------------------------- */

/// Full Merkle tree keeping every level (leaves first, root last).
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree over already-hashed leaves.
    ///
    /// # Errors
    /// [`MerkleError::LeafCount`] unless the leaf count is a non-zero power
    /// of two no larger than `2^MAX_DEPTH`.
    pub fn from_leaves(leaves: Vec<Digest>) -> Result<Self, MerkleError> {
        let n = leaves.len();
        if n == 0 || !n.is_power_of_two() || n.trailing_zeros() as usize > MAX_DEPTH {
            return Err(MerkleError::LeafCount(n));
        }
        let mut levels = vec![leaves];
        while let Some(prev) = levels.last().filter(|l| l.len() > 1) {
            let next = parent_level(prev);
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Hash `rows` under `label` and build the tree.
    ///
    /// # Errors
    /// As [`Self::from_leaves`].
    pub fn from_rows(label: &str, rows: &[Vec<[u8; 8]>]) -> Result<Self, MerkleError> {
        #[cfg(feature = "parallel")]
        let leaves: Vec<Digest> = rows.par_iter().map(|r| hash_leaf(label, r)).collect();
        #[cfg(not(feature = "parallel"))]
        let leaves: Vec<Digest> = rows.iter().map(|r| hash_leaf(label, r)).collect();
        Self::from_leaves(leaves)
    }

    /// Root digest.
    #[must_use]
    pub fn root(&self) -> Digest {
        self.levels
            .last()
            .and_then(|l| l.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of levels above the leaves.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// Always `false`: trees have at least one leaf.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Authentication path (bottom to top) for leaf `index`.
    ///
    /// # Errors
    /// [`MerkleError::IndexOutOfRange`] if `index` is not a leaf.
    pub fn open(&self, index: usize) -> Result<Vec<Digest>, MerkleError> {
        if index >= self.len() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                depth: self.depth(),
            });
        }
        let mut idx = index;
        let path = self.levels[..self.depth()]
            .iter()
            .map(|level| {
                let sib = level[idx ^ 1];
                idx >>= 1;
                sib
            })
            .collect();
        Ok(path)
    }
}

fn parent_level(prev: &[Digest]) -> Vec<Digest> {
    #[cfg(feature = "parallel")]
    {
        prev.par_chunks_exact(2)
            .map(|pair| hash_node(&pair[0], &pair[1]))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        prev.chunks_exact(2)
            .map(|pair| hash_node(&pair[0], &pair[1]))
            .collect()
    }
}

/// Lowercase hex rendering of a digest, for logs and fixture files.
#[must_use]
pub fn digest_hex(d: &Digest) -> String {
    hex::encode(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: usize) -> Vec<Digest> {
        (0..n as u64)
            .map(|i| hash_leaf("t", &[i.to_le_bytes()]))
            .collect()
    }

    #[test]
    fn single_leaf_tree_has_depth_zero() {
        let l = leaves(1);
        let t = MerkleTree::from_leaves(l.clone()).unwrap();
        assert_eq!(t.depth(), 0);
        assert_eq!(t.root(), l[0]);
        assert!(t.open(0).unwrap().is_empty());
        assert_eq!(verify_open(&t.root(), 0, &l[0], &[], 0), Ok(true));
    }

    #[test]
    fn rejects_non_power_of_two() {
        assert_eq!(
            MerkleTree::from_leaves(leaves(3)).unwrap_err(),
            MerkleError::LeafCount(3)
        );
        assert!(MerkleTree::from_leaves(Vec::new()).is_err());
    }

    #[test]
    fn label_separates_leaves() {
        let row = [7u64.to_le_bytes()];
        assert_ne!(hash_leaf("trace", &row), hash_leaf("fixed", &row));
    }
}
