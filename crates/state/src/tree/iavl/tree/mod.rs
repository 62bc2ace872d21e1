// Path: crates/state/src/tree/iavl/tree/mod.rs

//! An in-memory, versioned IAVL tree that the proof layer can read from.
//!
//! Writes are staged and stamped with a version on `commit_version`. Each
//! commit rebuilds the inner nodes over the sorted leaves as a perfectly
//! balanced tree; unchanged leaves are shared between versions along with
//! their cached hashes. Hashes are computed lazily and cached per node.

use super::access::{TreeNode, VersionedTree};
use super::node::{hash_inner_parts, hash_leaf_parts};
use avlproof_types::error::StateError;
use avlproof_types::NodeHash;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

/// A node of a [`MemTree`].
#[derive(Debug)]
pub struct MemNode {
    key: Vec<u8>,
    value: Vec<u8>,
    version: u64,
    height: i8,
    size: i64,
    children: Option<(Arc<MemNode>, Arc<MemNode>)>,
    hash: OnceLock<NodeHash>,
}

impl MemNode {
    fn new_leaf(key: Vec<u8>, value: Vec<u8>, version: u64) -> Self {
        Self {
            key,
            value,
            version,
            height: 0,
            size: 1,
            children: None,
            hash: OnceLock::new(),
        }
    }

    /// `split_key` is the smallest key under `right`; `version` is the commit
    /// that built the node.
    fn new_inner(
        split_key: Vec<u8>,
        left: Arc<MemNode>,
        right: Arc<MemNode>,
        version: u64,
    ) -> Self {
        Self {
            key: split_key,
            value: Vec::new(),
            version,
            height: 1 + left.height.max(right.height),
            size: left.size + right.size,
            children: Some((left, right)),
            hash: OnceLock::new(),
        }
    }

    /// Returns this node's hash and how many hashes had to be computed for it.
    fn hash_with_count(&self) -> (NodeHash, u64) {
        if let Some(hash) = self.hash.get() {
            return (*hash, 0);
        }
        let (hash, count) = match &self.children {
            None => (hash_leaf_parts(&self.key, &self.value, self.version), 1),
            Some((left, right)) => {
                let (left_hash, left_count) = left.hash_with_count();
                let (right_hash, right_count) = right.hash_with_count();
                (
                    hash_inner_parts(self.height, self.size, &left_hash, &right_hash),
                    left_count + right_count + 1,
                )
            }
        };
        // A concurrent hash pass may have won the race; both computed the same bytes.
        let _ = self.hash.set(hash);
        (hash, count)
    }

    fn child(
        &self,
        pick: fn(&(Arc<MemNode>, Arc<MemNode>)) -> &Arc<MemNode>,
    ) -> Result<Arc<Self>, StateError> {
        self.children
            .as_ref()
            .map(|c| Arc::clone(pick(c)))
            .ok_or_else(|| {
                StateError::Backend(format!("leaf 0x{} has no children", hex::encode(&self.key)))
            })
    }

    /// Rank of `key` in this subtree and its value if present.
    fn get_indexed(&self, key: &[u8]) -> (u64, Option<Vec<u8>>) {
        match &self.children {
            None => match key.cmp(&self.key) {
                Ordering::Equal => (0, Some(self.value.clone())),
                Ordering::Less => (0, None),
                Ordering::Greater => (1, None),
            },
            Some((left, right)) => {
                if key < self.key.as_slice() {
                    left.get_indexed(key)
                } else {
                    let (idx, value) = right.get_indexed(key);
                    (idx + left.size.unsigned_abs(), value)
                }
            }
        }
    }

    /// The leaf at sorted position `index` in this subtree.
    fn get_by_index(&self, index: u64) -> Option<&MemNode> {
        match &self.children {
            None => (index == 0).then_some(self),
            Some((left, right)) => {
                let left_size = left.size.unsigned_abs();
                if index < left_size {
                    left.get_by_index(index)
                } else {
                    right.get_by_index(index - left_size)
                }
            }
        }
    }
}

impl TreeNode for MemNode {
    fn height(&self) -> i8 {
        self.height
    }

    fn size(&self) -> i64 {
        self.size
    }

    fn key(&self) -> &[u8] {
        &self.key
    }

    fn value(&self) -> &[u8] {
        &self.value
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn cached_hash(&self) -> Option<NodeHash> {
        self.hash.get().copied()
    }

    fn left_node(&self) -> Result<Arc<Self>, StateError> {
        self.child(|(left, _)| left)
    }

    fn right_node(&self) -> Result<Arc<Self>, StateError> {
        self.child(|(_, right)| right)
    }
}

/// Builds a balanced subtree over sorted leaves, stamping inner nodes with `version`.
fn build_balanced(leaves: &[Arc<MemNode>], version: u64) -> Option<Arc<MemNode>> {
    if leaves.len() <= 1 {
        return leaves.first().cloned();
    }
    let (left_leaves, right_leaves) = leaves.split_at(leaves.len() / 2);
    let split_key = right_leaves.first()?.key.clone();
    let left = build_balanced(left_leaves, version)?;
    let right = build_balanced(right_leaves, version)?;
    Some(Arc::new(MemNode::new_inner(split_key, left, right, version)))
}

/// In-memory versioned tree.
#[derive(Clone, Default)]
pub struct MemTree {
    /// Committed leaves, sorted by key.
    leaves: BTreeMap<Vec<u8>, Arc<MemNode>>,
    /// Writes since the last commit; `None` marks a removal.
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
    root: Option<Arc<MemNode>>,
    version: u64,
}

impl Debug for MemTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemTree")
            .field("version", &self.version)
            .field("len", &self.leaves.len())
            .field("staged_len", &self.staged.len())
            .field(
                "root_hash",
                &self.root.as_ref().and_then(|r| r.cached_hash()).map(hex::encode),
            )
            .finish()
    }
}

impl MemTree {
    /// Creates a new, empty tree at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a write; it becomes visible on the next commit.
    pub fn set(&mut self, key: &[u8], value: &[u8]) {
        self.staged.insert(key.to_vec(), Some(value.to_vec()));
    }

    /// Stages a removal; it takes effect on the next commit.
    pub fn remove(&mut self, key: &[u8]) {
        self.staged.insert(key.to_vec(), None);
    }

    /// Applies staged writes at `version` and rebuilds the tree.
    ///
    /// Returns the new root hash, or `None` if the tree is now empty.
    pub fn commit_version(&mut self, version: u64) -> Result<Option<NodeHash>, StateError> {
        if version <= self.version {
            return Err(StateError::StaleVersion {
                latest: self.version,
                got: version,
            });
        }

        let staged = std::mem::take(&mut self.staged);
        let changed = staged.len();
        for (key, write) in staged {
            match write {
                Some(value) => {
                    let leaf = MemNode::new_leaf(key.clone(), value, version);
                    self.leaves.insert(key, Arc::new(leaf));
                }
                None => {
                    self.leaves.remove(&key);
                }
            }
        }

        let sorted: Vec<Arc<MemNode>> = self.leaves.values().cloned().collect();
        self.root = build_balanced(&sorted, version);
        self.version = version;

        let root_hash = self.hash_all()?;
        log::debug!(
            "MemTree commit_version {}: {} staged writes, {} keys, root {}",
            version,
            changed,
            self.leaves.len(),
            root_hash.map(hex::encode).unwrap_or_else(|| "<empty>".into())
        );
        Ok(root_hash)
    }

    /// The last committed version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// True if no keys are committed.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

impl VersionedTree for MemTree {
    type Node = MemNode;

    fn root(&self) -> Option<Arc<MemNode>> {
        self.root.clone()
    }

    fn hash_all(&self) -> Result<Option<NodeHash>, StateError> {
        Ok(self.root.as_ref().map(|root| {
            let (hash, count) = root.hash_with_count();
            if count > 0 {
                log::trace!("MemTree hashed {} nodes", count);
            }
            hash
        }))
    }

    fn get(&self, key: &[u8]) -> Result<(u64, Option<Vec<u8>>), StateError> {
        Ok(self
            .root
            .as_ref()
            .map_or((0, None), |root| root.get_indexed(key)))
    }

    fn get_by_index(&self, index: u64) -> Result<Option<(Vec<u8>, Vec<u8>)>, StateError> {
        Ok(self
            .root
            .as_ref()
            .and_then(|root| root.get_by_index(index))
            .map(|leaf| (leaf.key.clone(), leaf.value.clone())))
    }

    fn size(&self) -> u64 {
        self.leaves.len() as u64
    }
}
