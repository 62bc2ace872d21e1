// Path: crates/state/src/tree/iavl/proof.rs
//! Proof data structures for the IAVL tree.
//!
//! Proofs are plain data: a snapshot of one `(root_hash, version)` pair plus the
//! sibling hashes needed to recompute that root. Nothing here trusts the
//! embedded root; see [`super::verifier`] for the checks.

use super::node::{InnerNode, InnerNodeJson, LeafNode, Sibling};
use super::verifier::ProofVerifier;
use avlproof_types::codec::{from_bytes_canonical, to_bytes_canonical};
use avlproof_types::error::ProofError;
use avlproof_types::NodeHash;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The sibling trail from a leaf up to the root.
///
/// `inner_nodes` is ordered innermost first: the entry nearest the leaf comes
/// first and the root's entry comes last. It is folded in exactly that order.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    /// Ancestors of the leaf, nearest first.
    pub inner_nodes: Vec<InnerNode>,
}

impl Path {
    /// Folds the path over `leaf_hash` and returns the implied root.
    pub fn compute_root(&self, leaf_hash: NodeHash) -> NodeHash {
        self.inner_nodes
            .iter()
            .fold(leaf_hash, |hash, branch| branch.hash(&hash))
    }

    /// Number of ancestors on the path.
    pub fn len(&self) -> usize {
        self.inner_nodes.len()
    }

    /// True for the path of a tree with a single leaf.
    pub fn is_empty(&self) -> bool {
        self.inner_nodes.is_empty()
    }

    /// True if the path turns left at every ancestor, i.e. it ends at the
    /// smallest key in the tree.
    pub fn is_leftmost(&self) -> bool {
        self.inner_nodes
            .iter()
            .all(|n| matches!(n.sibling, Sibling::Right(_)))
    }

    /// True if the path turns right at every ancestor, i.e. it ends at the
    /// largest key in the tree.
    pub fn is_rightmost(&self) -> bool {
        self.inner_nodes
            .iter()
            .all(|n| matches!(n.sibling, Sibling::Left(_)))
    }

    /// True if the leaf at the end of `self` is immediately followed, in key
    /// order, by the leaf at the end of `right`.
    ///
    /// Both paths must share their root-side entries up to a single divergence
    /// node where `self` turns left and `right` turns right. Below it, `self`
    /// must be rightmost and `right` leftmost.
    pub fn is_left_adjacent_to(&self, right: &Path) -> bool {
        let mut lhs = self.inner_nodes.iter().rev().peekable();
        let mut rhs = right.inner_nodes.iter().rev().peekable();

        while let (Some(l), Some(r)) = (lhs.peek(), rhs.peek()) {
            if l != r {
                break;
            }
            lhs.next();
            rhs.next();
        }

        let (Some(l), Some(r)) = (lhs.next(), rhs.next()) else {
            return false;
        };
        let diverges = l.height == r.height
            && l.size == r.size
            && matches!(l.sibling, Sibling::Right(_))
            && matches!(r.sibling, Sibling::Left(_));

        diverges
            && lhs.all(|n| matches!(n.sibling, Sibling::Left(_)))
            && rhs.all(|n| matches!(n.sibling, Sibling::Right(_)))
    }
}

/// An inclusion sub-proof for one key: its path and its leaf.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PathWithNode {
    /// The path from the leaf to the root.
    pub path: Path,
    /// The leaf being proven.
    pub node: LeafNode,
}

impl PathWithNode {
    /// The root this sub-proof implies.
    pub fn compute_root(&self) -> NodeHash {
        self.path.compute_root(self.node.hash())
    }
}

/// Evidence that a key/value pair is present under `root_hash`.
///
/// The key and value are not part of the proof; the verifier supplies them.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExistenceProof {
    /// The root the proof was built against. Informational only.
    #[serde(with = "hex::serde")]
    pub root_hash: NodeHash,
    /// The path from the leaf to the root.
    pub path: Path,
    /// The version at which the leaf was last written.
    pub version: u64,
}

impl ExistenceProof {
    /// The root implied by this proof for the given key/value pair.
    pub fn compute_root(&self, key: &[u8], value: &[u8]) -> NodeHash {
        let leaf = LeafNode {
            key: key.to_vec(),
            value: value.to_vec(),
            version: self.version,
        };
        self.path.compute_root(leaf.hash())
    }
}

/// Evidence that no value is stored under a key, given by its neighbours.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NonExistenceProof {
    /// The root the proof was built against. Informational only.
    #[serde(with = "hex::serde")]
    pub root_hash: NodeHash,
    /// The version of the tree's root when the proof was built.
    pub version: u64,
    /// The greatest key below the missing one, if any.
    pub left: Option<PathWithNode>,
    /// The smallest key above the missing one, if any.
    pub right: Option<PathWithNode>,
}

impl NonExistenceProof {
    /// The root implied by the neighbour sub-proofs.
    ///
    /// Fails if there are no neighbours or if the two neighbours disagree.
    pub fn compute_root(&self) -> Result<NodeHash, ProofError> {
        let left = self.left.as_ref().map(PathWithNode::compute_root);
        let right = self.right.as_ref().map(PathWithNode::compute_root);
        match (left, right) {
            (Some(l), None) => Ok(l),
            (None, Some(r)) => Ok(r),
            (Some(l), Some(r)) if l == r => Ok(l),
            (Some(_), Some(_)) => Err(ProofError::InvalidProof(
                "neighbours imply different roots".into(),
            )),
            (None, None) => Err(ProofError::InvalidProof(
                "non-existence proof has no neighbours".into(),
            )),
        }
    }
}

/// Either kind of proof, for transports that do not know the kind up front.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IavlProof {
    /// An inclusion proof.
    Existence(ExistenceProof),
    /// A non-existence proof.
    NonExistence(NonExistenceProof),
}

impl IavlProof {
    /// Decodes a proof from its canonical bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        from_bytes_canonical(bytes).map_err(ProofError::Deserialization)
    }

    /// Decodes a proof from JSON.
    ///
    /// Malformed JSON is `Deserialization`; an inner node with both or neither
    /// slot populated is `InvalidProof`.
    pub fn from_json(json: &str) -> Result<Self, ProofError> {
        let raw: IavlProofJson =
            serde_json::from_str(json).map_err(|e| ProofError::Deserialization(e.to_string()))?;
        raw.try_into()
    }

    /// Encodes the proof as JSON.
    pub fn to_json(&self) -> Result<String, ProofError> {
        serde_json::to_string(self).map_err(|e| ProofError::Deserialization(e.to_string()))
    }
}

// Two-slot JSON mirrors: slots are checked after parsing so that a bad inner
// node keeps its `InvalidProof` kind instead of becoming a serde error.

#[derive(Deserialize)]
struct PathJson {
    inner_nodes: Vec<InnerNodeJson>,
}

impl TryFrom<PathJson> for Path {
    type Error = ProofError;

    fn try_from(raw: PathJson) -> Result<Self, Self::Error> {
        let inner_nodes = raw
            .inner_nodes
            .into_iter()
            .map(InnerNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Path { inner_nodes })
    }
}

#[derive(Deserialize)]
struct PathWithNodeJson {
    path: PathJson,
    node: LeafNode,
}

impl TryFrom<PathWithNodeJson> for PathWithNode {
    type Error = ProofError;

    fn try_from(raw: PathWithNodeJson) -> Result<Self, Self::Error> {
        Ok(PathWithNode {
            path: raw.path.try_into()?,
            node: raw.node,
        })
    }
}

#[derive(Deserialize)]
struct ExistenceProofJson {
    #[serde(with = "hex::serde")]
    root_hash: NodeHash,
    path: PathJson,
    version: u64,
}

#[derive(Deserialize)]
struct NonExistenceProofJson {
    #[serde(with = "hex::serde")]
    root_hash: NodeHash,
    version: u64,
    left: Option<PathWithNodeJson>,
    right: Option<PathWithNodeJson>,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum IavlProofJson {
    Existence(ExistenceProofJson),
    NonExistence(NonExistenceProofJson),
}

impl TryFrom<IavlProofJson> for IavlProof {
    type Error = ProofError;

    fn try_from(raw: IavlProofJson) -> Result<Self, Self::Error> {
        Ok(match raw {
            IavlProofJson::Existence(p) => IavlProof::Existence(ExistenceProof {
                root_hash: p.root_hash,
                path: p.path.try_into()?,
                version: p.version,
            }),
            IavlProofJson::NonExistence(p) => IavlProof::NonExistence(NonExistenceProof {
                root_hash: p.root_hash,
                version: p.version,
                left: p.left.map(PathWithNode::try_from).transpose()?,
                right: p.right.map(PathWithNode::try_from).transpose()?,
            }),
        })
    }
}

impl From<ExistenceProof> for IavlProof {
    fn from(p: ExistenceProof) -> Self {
        IavlProof::Existence(p)
    }
}

impl From<NonExistenceProof> for IavlProof {
    fn from(p: NonExistenceProof) -> Self {
        IavlProof::NonExistence(p)
    }
}

/// Common surface of every proof kind.
pub trait KeyProof {
    /// The root the proof was built against.
    fn root_hash(&self) -> &NodeHash;

    /// Checks the proof for `key` against `trusted_root` using default limits.
    ///
    /// `value` must be `Some` for an inclusion proof and `None` for a
    /// non-existence proof.
    fn verify(
        &self,
        key: &[u8],
        value: Option<&[u8]>,
        trusted_root: &NodeHash,
    ) -> Result<(), ProofError>;

    /// The canonical bytes of the proof, ready for transmission.
    fn to_bytes(&self) -> Vec<u8>;
}

impl KeyProof for ExistenceProof {
    fn root_hash(&self) -> &NodeHash {
        &self.root_hash
    }

    fn verify(
        &self,
        key: &[u8],
        value: Option<&[u8]>,
        trusted_root: &NodeHash,
    ) -> Result<(), ProofError> {
        let value = value.ok_or_else(|| {
            ProofError::InvalidInputs("an inclusion proof needs the value it binds".into())
        })?;
        ProofVerifier::default().verify_existence(self, trusted_root, key, value)
    }

    fn to_bytes(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }
}

impl KeyProof for NonExistenceProof {
    fn root_hash(&self) -> &NodeHash {
        &self.root_hash
    }

    fn verify(
        &self,
        key: &[u8],
        value: Option<&[u8]>,
        trusted_root: &NodeHash,
    ) -> Result<(), ProofError> {
        if value.is_some() {
            return Err(ProofError::InvalidInputs(
                "a non-existence proof cannot bind a value".into(),
            ));
        }
        ProofVerifier::default().verify_non_existence(self, trusted_root, key)
    }

    fn to_bytes(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }
}

impl KeyProof for IavlProof {
    fn root_hash(&self) -> &NodeHash {
        match self {
            IavlProof::Existence(p) => p.root_hash(),
            IavlProof::NonExistence(p) => p.root_hash(),
        }
    }

    fn verify(
        &self,
        key: &[u8],
        value: Option<&[u8]>,
        trusted_root: &NodeHash,
    ) -> Result<(), ProofError> {
        ProofVerifier::default().verify_proof(trusted_root, key, value, self)
    }

    fn to_bytes(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn went_left(tag: u8) -> InnerNode {
        InnerNode::from_slots(1, 2, None, Some([tag; 20])).unwrap()
    }

    fn went_right(tag: u8) -> InnerNode {
        InnerNode::from_slots(1, 2, Some([tag; 20]), None).unwrap()
    }

    #[test]
    fn test_empty_path_is_both_extremes() {
        let path = Path::default();
        assert!(path.is_leftmost());
        assert!(path.is_rightmost());
        assert_eq!(path.compute_root([5u8; 20]), [5u8; 20]);
    }

    #[test]
    fn test_fold_order_matters() {
        let path = Path {
            inner_nodes: vec![
                InnerNode::from_slots(1, 2, None, Some([1u8; 20])).unwrap(),
                InnerNode::from_slots(2, 3, Some([2u8; 20]), None).unwrap(),
            ],
        };
        let reversed = Path {
            inner_nodes: path.inner_nodes.iter().rev().cloned().collect(),
        };
        assert_ne!(path.compute_root([9u8; 20]), reversed.compute_root([9u8; 20]));
    }

    #[test]
    fn test_adjacency_across_divergence_node() {
        // Shared root entry, then the divergence node, then one step each.
        let root = went_right(0xAA);
        let left = Path {
            inner_nodes: vec![went_right(1), went_left(2), root.clone()],
        };
        let right = Path {
            inner_nodes: vec![went_left(3), went_right(4), root.clone()],
        };
        // Divergence entries differ in their sibling payloads.
        assert!(left.is_left_adjacent_to(&right));
        assert!(!right.is_left_adjacent_to(&left));

        // The left side must be rightmost below the divergence node.
        let not_rightmost = Path {
            inner_nodes: vec![went_left(1), went_left(2), root.clone()],
        };
        assert!(!not_rightmost.is_left_adjacent_to(&right));

        // Identical paths never diverge.
        assert!(!left.is_left_adjacent_to(&left));
    }

    #[test]
    fn test_non_existence_root_needs_a_neighbour() {
        let proof = NonExistenceProof {
            root_hash: [0u8; 20],
            version: 1,
            left: None,
            right: None,
        };
        assert!(matches!(
            proof.compute_root(),
            Err(ProofError::InvalidProof(_))
        ));
    }

    #[test]
    fn test_bytes_and_json_transport() {
        let proof = IavlProof::Existence(ExistenceProof {
            root_hash: [3u8; 20],
            path: Path {
                inner_nodes: vec![went_left(7)],
            },
            version: 42,
        });

        let decoded = IavlProof::from_bytes(&proof.to_bytes()).unwrap();
        assert_eq!(decoded, proof);

        let json = proof.to_json().unwrap();
        assert!(json.contains(&"03".repeat(20)));
        assert_eq!(IavlProof::from_json(&json).unwrap(), proof);

        assert!(matches!(
            IavlProof::from_bytes(&[0xFF, 0x00]),
            Err(ProofError::Deserialization(_))
        ));
    }

    #[test]
    fn test_json_inner_node_slots_keep_invalid_proof_kind() {
        let proof = IavlProof::Existence(ExistenceProof {
            root_hash: [3u8; 20],
            path: Path {
                inner_nodes: vec![went_left(7)],
            },
            version: 42,
        });
        let json = proof.to_json().unwrap();
        let hash = "07".repeat(20);

        let neither = json.replace(&format!("\"right\":\"{hash}\""), "\"right\":null");
        assert_ne!(neither, json);
        assert!(matches!(
            IavlProof::from_json(&neither),
            Err(ProofError::InvalidProof(_))
        ));

        let both = json.replace("\"left\":null", &format!("\"left\":\"{hash}\""));
        assert_ne!(both, json);
        assert!(matches!(
            IavlProof::from_json(&both),
            Err(ProofError::InvalidProof(_))
        ));

        assert!(matches!(
            IavlProof::from_json("{\"existence\":"),
            Err(ProofError::Deserialization(_))
        ));
    }
}
