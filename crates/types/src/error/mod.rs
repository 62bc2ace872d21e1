// Path: crates/types/src/error/mod.rs
//! Core error types for the AVL proof layer.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors reported by the versioned tree that the proof layer reads from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A node was visited before its hash was computed.
    #[error("Node hash has not been computed; run a full-tree hash pass first")]
    UnhashedNode,
    /// An error occurred in the tree backend, e.g. while materializing a child.
    #[error("State backend error: {0}")]
    Backend(String),
    /// A commit was attempted at a version that is not newer than the latest.
    #[error("Version {got} is not newer than the latest committed version {latest}")]
    StaleVersion {
        /// The latest committed version.
        latest: u64,
        /// The version that was requested.
        got: u64,
    },
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnhashedNode => "STATE_UNHASHED_NODE",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::StaleVersion { .. } => "STATE_STALE_VERSION",
        }
    }
}

/// Errors raised while constructing or verifying a proof.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A proof was requested from an empty tree.
    #[error("Tree root is nil")]
    NilRoot,
    /// The key for an inclusion proof is not present in the tree.
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    /// The request itself was malformed.
    #[error("Invalid inputs: {0}")]
    InvalidInputs(String),
    /// The root implied by the proof does not match the trusted root.
    #[error("Invalid root")]
    InvalidRoot,
    /// The proof is structurally malformed or violates a bracketing rule.
    #[error("Invalid proof: {0}")]
    InvalidProof(String),
    /// Proof bytes or JSON could not be decoded.
    #[error("Proof deserialization failed: {0}")]
    Deserialization(String),
    /// The underlying tree failed while a proof was being built.
    #[error(transparent)]
    State(#[from] StateError),
}

impl ErrorCode for ProofError {
    fn code(&self) -> &'static str {
        match self {
            Self::NilRoot => "PROOF_NIL_ROOT",
            Self::KeyNotFound(_) => "PROOF_KEY_NOT_FOUND",
            Self::InvalidInputs(_) => "PROOF_INVALID_INPUTS",
            Self::InvalidRoot => "PROOF_INVALID_ROOT",
            Self::InvalidProof(_) => "PROOF_INVALID_PROOF",
            Self::Deserialization(_) => "PROOF_DESERIALIZATION_FAILED",
            Self::State(e) => e.code(),
        }
    }
}
