// Path: crates/crypto/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # AVL Proof Crypto
//!
//! Hash functions used to content-address tree nodes and fold proofs.

/// Cryptographic algorithm implementations.
pub mod algorithms;
