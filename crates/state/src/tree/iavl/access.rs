// Path: crates/state/src/tree/iavl/access.rs

//! The read-only view of a versioned tree that proof construction needs.
//!
//! Mutation, balancing and persistence stay with the tree implementation; the
//! proof layer only walks nodes, reads cached hashes and asks for order
//! statistics.

use avlproof_types::error::StateError;
use avlproof_types::NodeHash;
use std::sync::Arc;

/// A node of a sorted, content-addressed binary tree.
///
/// Leaves have height 0 and hold a key/value pair. Inner nodes hold the
/// smallest key of their right subtree: keys strictly below it live on the
/// left, everything else on the right.
pub trait TreeNode: Sized {
    /// Height of the node; 0 for leaves.
    fn height(&self) -> i8;
    /// Number of leaves under the node; 1 for leaves.
    fn size(&self) -> i64;
    /// The leaf key, or the split key of an inner node.
    fn key(&self) -> &[u8];
    /// The leaf value; empty for inner nodes.
    fn value(&self) -> &[u8];
    /// The version at which this node was last written.
    fn version(&self) -> u64;
    /// The node's hash, if the tree has computed it.
    fn cached_hash(&self) -> Option<NodeHash>;
    /// The left child. May load it from storage.
    fn left_node(&self) -> Result<Arc<Self>, StateError>;
    /// The right child. May load it from storage.
    fn right_node(&self) -> Result<Arc<Self>, StateError>;

    /// True for leaves.
    fn is_leaf(&self) -> bool {
        self.height() == 0
    }
}

/// A versioned, sorted key-value tree whose root can be proven against.
pub trait VersionedTree {
    /// The node type the tree is made of.
    type Node: TreeNode;

    /// The root of the current version, or `None` for an empty tree.
    fn root(&self) -> Option<Arc<Self::Node>>;

    /// Computes every missing node hash and returns the root hash, or `None`
    /// for an empty tree. Must run before any path is built.
    fn hash_all(&self) -> Result<Option<NodeHash>, StateError>;

    /// Returns `(rank, value)`: the number of keys sorting before `key`, and
    /// the value if `key` is present.
    fn get(&self, key: &[u8]) -> Result<(u64, Option<Vec<u8>>), StateError>;

    /// Returns the key/value pair at sorted position `index`.
    fn get_by_index(&self, index: u64) -> Result<Option<(Vec<u8>, Vec<u8>)>, StateError>;

    /// Number of keys in the current version.
    fn size(&self) -> u64;
}
