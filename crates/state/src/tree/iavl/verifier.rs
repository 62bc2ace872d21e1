// Path: crates/state/src/tree/iavl/verifier.rs
//! Stateless verification of IAVL proofs against a trusted root.
//!
//! The root embedded in a proof is never trusted. Every check recomputes the
//! root from the leaf upwards and compares it to the caller's root.

use super::node::LeafNode;
use super::proof::{ExistenceProof, IavlProof, NonExistenceProof, Path, PathWithNode};
use avlproof_types::config::ProofConfig;
use avlproof_types::error::ProofError;
use avlproof_types::NodeHash;
use tracing::warn;

/// Verifies proofs under a set of limits.
#[derive(Debug, Clone, Default)]
pub struct ProofVerifier {
    config: ProofConfig,
}

impl ProofVerifier {
    /// Creates a verifier with the given limits.
    pub fn new(config: ProofConfig) -> Self {
        Self { config }
    }

    /// Decodes proof bytes received from an untrusted peer.
    pub fn decode_proof(&self, bytes: &[u8]) -> Result<IavlProof, ProofError> {
        if bytes.len() > self.config.max_proof_bytes {
            return Err(ProofError::Deserialization(format!(
                "proof is {} bytes, limit is {}",
                bytes.len(),
                self.config.max_proof_bytes
            )));
        }
        IavlProof::from_bytes(bytes)
    }

    fn check_path_len(&self, path: &Path) -> Result<(), ProofError> {
        if path.len() > self.config.max_path_len {
            return Err(ProofError::InvalidProof(format!(
                "path has {} entries, limit is {}",
                path.len(),
                self.config.max_path_len
            )));
        }
        Ok(())
    }

    fn check_root(computed: &NodeHash, trusted_root: &NodeHash) -> Result<(), ProofError> {
        if computed != trusted_root {
            warn!(
                target: "iavl_proof",
                computed = %hex::encode(computed),
                trusted = %hex::encode(trusted_root),
                "proof does not fold to the trusted root"
            );
            return Err(ProofError::InvalidRoot);
        }
        Ok(())
    }

    fn verify_leaf_path(
        &self,
        path: &Path,
        leaf: &LeafNode,
        trusted_root: &NodeHash,
    ) -> Result<(), ProofError> {
        self.check_path_len(path)?;
        Self::check_root(&path.compute_root(leaf.hash()), trusted_root)
    }

    /// Checks that `key` maps to `value` under `trusted_root`.
    pub fn verify_existence(
        &self,
        proof: &ExistenceProof,
        trusted_root: &NodeHash,
        key: &[u8],
        value: &[u8],
    ) -> Result<(), ProofError> {
        Self::check_root(&proof.root_hash, trusted_root)?;
        let leaf = LeafNode {
            key: key.to_vec(),
            value: value.to_vec(),
            version: proof.version,
        };
        self.verify_leaf_path(&proof.path, &leaf, trusted_root)
    }

    fn verify_neighbour(
        &self,
        side: &PathWithNode,
        trusted_root: &NodeHash,
    ) -> Result<(), ProofError> {
        self.verify_leaf_path(&side.path, &side.node, trusted_root)
    }

    /// Checks that nothing is stored under `key` in the tree with `trusted_root`.
    ///
    /// Each neighbour must be included under the root, must bracket `key`
    /// strictly, and the two must be tree-adjacent. A single neighbour is
    /// accepted only at the matching extreme of the tree.
    pub fn verify_non_existence(
        &self,
        proof: &NonExistenceProof,
        trusted_root: &NodeHash,
        key: &[u8],
    ) -> Result<(), ProofError> {
        Self::check_root(&proof.root_hash, trusted_root)?;

        if let Some(left) = &proof.left {
            self.verify_neighbour(left, trusted_root)?;
            if !left.node.is_lesser_than(key) {
                return Err(ProofError::InvalidProof(
                    "left neighbour does not sort before the key".into(),
                ));
            }
        }
        if let Some(right) = &proof.right {
            self.verify_neighbour(right, trusted_root)?;
            if !right.node.is_greater_than(key) {
                return Err(ProofError::InvalidProof(
                    "right neighbour does not sort after the key".into(),
                ));
            }
        }

        let bracketed = match (&proof.left, &proof.right) {
            (Some(left), Some(right)) => left.path.is_left_adjacent_to(&right.path),
            (Some(left), None) => left.path.is_rightmost(),
            (None, Some(right)) => right.path.is_leftmost(),
            (None, None) => {
                return Err(ProofError::InvalidProof(
                    "non-existence proof has no neighbours".into(),
                ))
            }
        };
        if !bracketed {
            warn!(
                target: "iavl_proof",
                key = %hex::encode(key),
                "neighbours are not adjacent around the key"
            );
            return Err(ProofError::InvalidProof(
                "neighbours are not adjacent around the key".into(),
            ));
        }
        Ok(())
    }

    /// The single entry point for verifying either kind of proof.
    ///
    /// `value` is `Some` to check inclusion and `None` to check absence; a
    /// mismatch between `value` and the proof kind is `InvalidInputs`.
    pub fn verify_proof(
        &self,
        trusted_root: &NodeHash,
        key: &[u8],
        value: Option<&[u8]>,
        proof: &IavlProof,
    ) -> Result<(), ProofError> {
        match (proof, value) {
            (IavlProof::Existence(p), Some(v)) => self.verify_existence(p, trusted_root, key, v),
            (IavlProof::NonExistence(p), None) => self.verify_non_existence(p, trusted_root, key),
            (IavlProof::Existence(_), None) => Err(ProofError::InvalidInputs(
                "an inclusion proof needs the value it binds".into(),
            )),
            (IavlProof::NonExistence(_), Some(_)) => Err(ProofError::InvalidInputs(
                "a non-existence proof cannot bind a value".into(),
            )),
        }
    }
}

/// Checks an inclusion proof with default limits.
pub fn verify_existence(
    proof: &ExistenceProof,
    trusted_root: &NodeHash,
    key: &[u8],
    value: &[u8],
) -> Result<(), ProofError> {
    ProofVerifier::default().verify_existence(proof, trusted_root, key, value)
}

/// Checks a non-existence proof with default limits.
pub fn verify_non_existence(
    proof: &NonExistenceProof,
    trusted_root: &NodeHash,
    key: &[u8],
) -> Result<(), ProofError> {
    ProofVerifier::default().verify_non_existence(proof, trusted_root, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::iavl::node::InnerNode;

    fn single_leaf_tree() -> (LeafNode, NodeHash) {
        let leaf = LeafNode {
            key: b"m".to_vec(),
            value: b"v".to_vec(),
            version: 1,
        };
        let root = leaf.hash();
        (leaf, root)
    }

    #[test]
    fn test_single_leaf_existence() {
        let (leaf, root) = single_leaf_tree();
        let proof = ExistenceProof {
            root_hash: root,
            path: Path::default(),
            version: 1,
        };
        assert!(verify_existence(&proof, &root, b"m", b"v").is_ok());
        assert_eq!(
            verify_existence(&proof, &root, b"m", b"w"),
            Err(ProofError::InvalidRoot)
        );
        assert_eq!(
            verify_existence(&proof, &[0u8; 20], &leaf.key, &leaf.value),
            Err(ProofError::InvalidRoot)
        );
    }

    #[test]
    fn test_single_leaf_open_bounds() {
        let (leaf, root) = single_leaf_tree();
        let side = PathWithNode {
            path: Path::default(),
            node: leaf,
        };
        let above = NonExistenceProof {
            root_hash: root,
            version: 1,
            left: Some(side.clone()),
            right: None,
        };
        let below = NonExistenceProof {
            root_hash: root,
            version: 1,
            left: None,
            right: Some(side),
        };
        assert!(verify_non_existence(&above, &root, b"z").is_ok());
        assert!(verify_non_existence(&below, &root, b"a").is_ok());

        // Swapped sides no longer bracket the key.
        assert!(matches!(
            verify_non_existence(&above, &root, b"a"),
            Err(ProofError::InvalidProof(_))
        ));
        assert!(matches!(
            verify_non_existence(&below, &root, b"m"),
            Err(ProofError::InvalidProof(_))
        ));
    }

    #[test]
    fn test_path_length_limit() {
        let (leaf, _) = single_leaf_tree();
        let path = Path {
            inner_nodes: vec![InnerNode::from_slots(1, 2, None, Some([0u8; 20])).unwrap(); 3],
        };
        let root = path.compute_root(leaf.hash());
        let proof = ExistenceProof {
            root_hash: root,
            path,
            version: 1,
        };
        let strict = ProofVerifier::new(ProofConfig {
            max_path_len: 2,
            ..ProofConfig::default()
        });
        assert!(matches!(
            strict.verify_existence(&proof, &root, b"m", b"v"),
            Err(ProofError::InvalidProof(_))
        ));
        assert!(verify_existence(&proof, &root, b"m", b"v").is_ok());
    }

    #[test]
    fn test_decode_respects_size_limit() {
        let verifier = ProofVerifier::new(ProofConfig {
            max_proof_bytes: 4,
            ..ProofConfig::default()
        });
        assert!(matches!(
            verifier.decode_proof(&[0u8; 5]),
            Err(ProofError::Deserialization(_))
        ));
    }

    #[test]
    fn test_value_must_match_proof_kind() {
        let (_, root) = single_leaf_tree();
        let proof = IavlProof::Existence(ExistenceProof {
            root_hash: root,
            path: Path::default(),
            version: 1,
        });
        assert!(matches!(
            ProofVerifier::default().verify_proof(&root, b"m", None, &proof),
            Err(ProofError::InvalidInputs(_))
        ));
        assert!(ProofVerifier::default()
            .verify_proof(&root, b"m", Some(b"v".as_slice()), &proof)
            .is_ok());
    }
}
