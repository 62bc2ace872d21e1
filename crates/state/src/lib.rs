// Path: crates/state/src/lib.rs
//! # AVL Proof State Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # AVL Proof State
//!
//! Merkle proofs of inclusion and non-existence over a versioned IAVL tree,
//! together with the stateless verifier that checks them against a trusted root.

pub mod tree;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::tree::iavl::{
        ExistenceProof, IavlProof, KeyProof, MemTree, NonExistenceProof, ProofProvider,
        ProofVerifier, VersionedTree,
    };
}
