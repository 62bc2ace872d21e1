// Path: crates/state/src/tree/iavl/proof_builder.rs
//! Tree-aware proof construction for the IAVL tree.
//!
//! This module walks a [`VersionedTree`] to build inclusion proofs and, for
//! keys that are absent, non-existence proofs made of the two tree-adjacent
//! neighbours found by rank lookup.

use super::access::{TreeNode, VersionedTree};
use super::node::{InnerNode, LeafNode, Sibling};
use super::proof::{ExistenceProof, IavlProof, NonExistenceProof, Path, PathWithNode};
use avlproof_types::error::{ProofError, StateError};
use avlproof_types::prelude::OptionExt;
use avlproof_types::NodeHash;
use std::sync::Arc;
use tracing::debug;

fn sibling_hash<N: TreeNode>(node: &N) -> Result<NodeHash, StateError> {
    node.cached_hash().required(StateError::UnhashedNode)
}

/// Builds the path from `node` down to the leaf holding `key`.
///
/// Returns `Ok(None)` when `key` is not in the subtree; that is a normal
/// outcome here, and the callers decide what it means. Errors are reserved for
/// the tree itself failing. Entries are appended as the recursion unwinds, so
/// the path comes out nearest-the-leaf first.
fn path_to_key<N: TreeNode>(
    node: &Arc<N>,
    key: &[u8],
) -> Result<Option<(Path, Arc<N>)>, ProofError> {
    if node.is_leaf() {
        return Ok((node.key() == key).then(|| (Path::default(), Arc::clone(node))));
    }

    let go_left = key < node.key();
    let child = if go_left {
        node.left_node()?
    } else {
        node.right_node()?
    };

    let Some((mut path, leaf)) = path_to_key(&child, key)? else {
        return Ok(None);
    };

    let sibling = if go_left {
        Sibling::Right(sibling_hash(node.right_node()?.as_ref())?)
    } else {
        Sibling::Left(sibling_hash(node.left_node()?.as_ref())?)
    };
    path.inner_nodes.push(InnerNode {
        height: node.height(),
        size: node.size(),
        sibling,
    });
    Ok(Some((path, leaf)))
}

/// Returns the root and its freshly computed hash, or `NilRoot`.
fn hashed_root<T: VersionedTree + ?Sized>(
    tree: &T,
) -> Result<(Arc<T::Node>, NodeHash), ProofError> {
    let root = tree.root().required(ProofError::NilRoot)?;
    let root_hash = tree.hash_all()?.required(ProofError::NilRoot)?;
    Ok((root, root_hash))
}

/// Builds an inclusion proof for `key` and returns the stored value with it.
///
/// Fails with `NilRoot` on an empty tree and `KeyNotFound` if `key` is absent;
/// ask for a non-existence proof instead in that case.
pub fn build_existence_proof<T: VersionedTree + ?Sized>(
    tree: &T,
    key: &[u8],
) -> Result<(Vec<u8>, ExistenceProof), ProofError> {
    let (root, root_hash) = hashed_root(tree)?;

    let (path, leaf) = path_to_key(&root, key)?.ok_or_else(|| {
        ProofError::KeyNotFound(format!(
            "could not construct path to key 0x{}",
            hex::encode(key)
        ))
    })?;

    debug!(
        target: "iavl_proof",
        key = %hex::encode(key),
        depth = path.len(),
        version = leaf.version(),
        "built existence proof"
    );

    let proof = ExistenceProof {
        root_hash,
        path,
        version: leaf.version(),
    };
    Ok((leaf.value().to_vec(), proof))
}

/// Builds the inclusion sub-proof for a neighbour that rank lookup reported.
///
/// The neighbour is known to exist, so failing to reach it means the tree's
/// order statistics and its node graph disagree.
fn neighbour_proof<N: TreeNode>(
    root: &Arc<N>,
    key: Vec<u8>,
    value: Vec<u8>,
) -> Result<PathWithNode, ProofError> {
    let (path, leaf) = path_to_key(root, &key)?.ok_or_else(|| {
        StateError::Backend(format!(
            "neighbour key 0x{} reported by rank lookup is missing from the tree",
            hex::encode(&key)
        ))
    })?;
    Ok(PathWithNode {
        path,
        node: LeafNode {
            key,
            value,
            version: leaf.version(),
        },
    })
}

/// Builds a non-existence proof for `key` from its two tree neighbours.
///
/// Fails with `NilRoot` on an empty tree and `InvalidInputs` if `key` exists.
pub fn build_non_existence_proof<T: VersionedTree + ?Sized>(
    tree: &T,
    key: &[u8],
) -> Result<NonExistenceProof, ProofError> {
    let (root, root_hash) = hashed_root(tree)?;

    // Rank is the index of the first key greater than `key` when it is absent.
    let (rank, value) = tree.get(key)?;
    if value.is_some() {
        return Err(ProofError::InvalidInputs(format!(
            "couldn't construct non-existence proof: key 0x{} exists",
            hex::encode(key)
        )));
    }

    let predecessor = match rank.checked_sub(1) {
        Some(idx) => tree.get_by_index(idx)?,
        None => None,
    };
    let successor = if rank < tree.size() {
        tree.get_by_index(rank)?
    } else {
        None
    };

    if predecessor.is_none() && successor.is_none() {
        return Err(StateError::Backend(format!(
            "inconsistent tree: rank {} of {} keys has neither a predecessor nor a successor",
            rank,
            tree.size()
        ))
        .into());
    }

    let left = predecessor
        .map(|(k, v)| neighbour_proof(&root, k, v))
        .transpose()?;
    let right = successor
        .map(|(k, v)| neighbour_proof(&root, k, v))
        .transpose()?;

    debug!(
        target: "iavl_proof",
        key = %hex::encode(key),
        rank,
        has_left = left.is_some(),
        has_right = right.is_some(),
        "built non-existence proof"
    );

    Ok(NonExistenceProof {
        root_hash,
        version: root.version(),
        left,
        right,
    })
}

/// Builds whichever proof fits `key`: inclusion if present, non-existence if not.
pub fn build_proof<T: VersionedTree + ?Sized>(
    tree: &T,
    key: &[u8],
) -> Result<(Option<Vec<u8>>, IavlProof), ProofError> {
    if tree.root().is_none() {
        return Err(ProofError::NilRoot);
    }
    match tree.get(key)? {
        (_, Some(_)) => {
            let (value, proof) = build_existence_proof(tree, key)?;
            Ok((Some(value), proof.into()))
        }
        (_, None) => Ok((None, build_non_existence_proof(tree, key)?.into())),
    }
}

/// Proof construction as methods on any [`VersionedTree`].
pub trait ProofProvider {
    /// See [`build_existence_proof`].
    fn get_with_proof(&self, key: &[u8]) -> Result<(Vec<u8>, ExistenceProof), ProofError>;
    /// See [`build_non_existence_proof`].
    fn key_absent_proof(&self, key: &[u8]) -> Result<NonExistenceProof, ProofError>;
    /// See [`build_proof`].
    fn create_proof(&self, key: &[u8]) -> Result<(Option<Vec<u8>>, IavlProof), ProofError>;
}

impl<T: VersionedTree> ProofProvider for T {
    fn get_with_proof(&self, key: &[u8]) -> Result<(Vec<u8>, ExistenceProof), ProofError> {
        build_existence_proof(self, key)
    }

    fn key_absent_proof(&self, key: &[u8]) -> Result<NonExistenceProof, ProofError> {
        build_non_existence_proof(self, key)
    }

    fn create_proof(&self, key: &[u8]) -> Result<(Option<Vec<u8>>, IavlProof), ProofError> {
        build_proof(self, key)
    }
}
