// Path: crates/state/src/tree/iavl/node.rs

//! Proof node types and their canonical hashing rules.
//!
//! A proof never carries a full tree node. An [`InnerNode`] keeps the height,
//! the subtree size and the hash of the one child the proof does *not* walk
//! through; the hash of the other child is recomputed by the verifier and fed
//! in through [`InnerNode::hash`]. A [`LeafNode`] carries everything needed to
//! recompute a leaf hash from scratch.

use super::encode;
use avlproof_crypto::algorithms::hash::ripemd160;
use avlproof_types::error::ProofError;
use avlproof_types::NodeHash;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash of an inner node from its parts. Shared by proof folding and the tree's
/// own hash pass so the two can never drift apart.
pub(crate) fn hash_inner_parts(height: i8, size: i64, left: &[u8], right: &[u8]) -> NodeHash {
    let mut buf = Vec::with_capacity(1 + 9 + 2 * (9 + left.len().max(right.len())));
    encode::write_int8(&mut buf, height);
    encode::write_varint(&mut buf, size);
    encode::write_byte_slice(&mut buf, left);
    encode::write_byte_slice(&mut buf, right);
    ripemd160(&buf)
}

/// Hash of a leaf from its parts. Height is always 0 and size always 1.
pub(crate) fn hash_leaf_parts(key: &[u8], value: &[u8], version: u64) -> NodeHash {
    let mut buf = Vec::with_capacity(1 + 2 + 9 + key.len() + 9 + value.len() + 8);
    encode::write_int8(&mut buf, 0);
    encode::write_varint(&mut buf, 1);
    encode::write_byte_slice(&mut buf, key);
    encode::write_byte_slice(&mut buf, value);
    encode::write_uint64(&mut buf, version);
    ripemd160(&buf)
}

/// The one populated child slot of an [`InnerNode`].
///
/// `Left(h)` means the proof walks through the right child and `h` is the hash
/// of the left subtree; `Right(h)` is the mirror image.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sibling {
    /// The left subtree's hash; the path continues to the right.
    Left(NodeHash),
    /// The right subtree's hash; the path continues to the left.
    Right(NodeHash),
}

/// One step of a path: an ancestor of the proven leaf, minus the child on the path.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "InnerNodeJson", into = "InnerNodeJson")]
pub struct InnerNode {
    /// Height of the ancestor; leaves sit at height 0.
    pub height: i8,
    /// Number of leaves under the ancestor.
    pub size: i64,
    /// The hash of the child that is not on the path.
    pub sibling: Sibling,
}

impl InnerNode {
    /// Builds an entry from two optional slots, the layout other implementations
    /// transmit. Exactly one slot must be populated.
    pub fn from_slots(
        height: i8,
        size: i64,
        left: Option<NodeHash>,
        right: Option<NodeHash>,
    ) -> Result<Self, ProofError> {
        let sibling = match (left, right) {
            (Some(l), None) => Sibling::Left(l),
            (None, Some(r)) => Sibling::Right(r),
            (Some(_), Some(_)) => {
                return Err(ProofError::InvalidProof(
                    "inner node has both left and right populated".into(),
                ))
            }
            (None, None) => {
                return Err(ProofError::InvalidProof(
                    "inner node has neither left nor right populated".into(),
                ))
            }
        };
        Ok(Self {
            height,
            size,
            sibling,
        })
    }

    /// The left slot, populated when the path continues to the right.
    pub fn left(&self) -> Option<&NodeHash> {
        match &self.sibling {
            Sibling::Left(h) => Some(h),
            Sibling::Right(_) => None,
        }
    }

    /// The right slot, populated when the path continues to the left.
    pub fn right(&self) -> Option<&NodeHash> {
        match &self.sibling {
            Sibling::Right(h) => Some(h),
            Sibling::Left(_) => None,
        }
    }

    /// Hashes this node with `child_hash` standing in for the empty slot.
    pub fn hash(&self, child_hash: &NodeHash) -> NodeHash {
        match &self.sibling {
            Sibling::Right(right) => hash_inner_parts(self.height, self.size, child_hash, right),
            Sibling::Left(left) => hash_inner_parts(self.height, self.size, left, child_hash),
        }
    }
}

impl fmt::Display for InnerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InnerNode[height={}, size={}, {} / {}]",
            self.height,
            self.size,
            self.left().map(hex::encode).unwrap_or_default(),
            self.right().map(hex::encode).unwrap_or_default(),
        )
    }
}

/// JSON layout of an [`InnerNode`]: two nullable hex slots.
#[derive(Serialize, Deserialize)]
pub(super) struct InnerNodeJson {
    height: i8,
    size: i64,
    left: Option<String>,
    right: Option<String>,
}

fn decode_slot(slot: Option<String>) -> Result<Option<NodeHash>, ProofError> {
    slot.map(|s| {
        let mut out = NodeHash::default();
        hex::decode_to_slice(&s, &mut out)
            .map_err(|e| ProofError::InvalidProof(format!("bad sibling hash {s:?}: {e}")))?;
        Ok(out)
    })
    .transpose()
}

impl TryFrom<InnerNodeJson> for InnerNode {
    type Error = ProofError;

    fn try_from(raw: InnerNodeJson) -> Result<Self, Self::Error> {
        InnerNode::from_slots(
            raw.height,
            raw.size,
            decode_slot(raw.left)?,
            decode_slot(raw.right)?,
        )
    }
}

impl From<InnerNode> for InnerNodeJson {
    fn from(node: InnerNode) -> Self {
        Self {
            height: node.height,
            size: node.size,
            left: node.left().map(hex::encode),
            right: node.right().map(hex::encode),
        }
    }
}

/// The proven leaf itself.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    /// The leaf's key.
    #[serde(with = "hex::serde")]
    pub key: Vec<u8>,
    /// The leaf's value.
    #[serde(with = "hex::serde")]
    pub value: Vec<u8>,
    /// The version at which this leaf was last written.
    pub version: u64,
}

impl LeafNode {
    /// Hashes the leaf exactly as the tree does.
    pub fn hash(&self) -> NodeHash {
        hash_leaf_parts(&self.key, &self.value, self.version)
    }

    /// True if this leaf's key sorts strictly before `key`.
    pub fn is_lesser_than(&self, key: &[u8]) -> bool {
        self.key.as_slice() < key
    }

    /// True if this leaf's key sorts strictly after `key`.
    pub fn is_greater_than(&self, key: &[u8]) -> bool {
        self.key.as_slice() > key
    }
}

impl fmt::Display for LeafNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LeafNode[key={}, value={}, version={}]",
            hex::encode(&self.key),
            hex::encode(&self.value),
            self.version
        )
    }
}
