// Path: crates/state/src/tree/iavl/mod.rs
//! IAVL (Immutable AVL) inclusion and non-existence proofs.
//! This module re-exports the public API from its constituent files.

mod access;
mod encode;
mod node;
pub mod proof;
mod proof_builder;
mod tree;
pub mod verifier;

// Re-export public API to maintain stability for external consumers.
pub use self::access::{TreeNode, VersionedTree};
pub use self::node::{InnerNode, LeafNode, Sibling};
pub use self::proof::{ExistenceProof, IavlProof, KeyProof, NonExistenceProof, Path, PathWithNode};
pub use self::proof_builder::{
    build_existence_proof, build_non_existence_proof, build_proof, ProofProvider,
};
pub use self::tree::{MemNode, MemTree};
pub use self::verifier::{verify_existence, verify_non_existence, ProofVerifier};
