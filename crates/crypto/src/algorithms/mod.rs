// Path: crates/crypto/src/algorithms/mod.rs
//! Cryptographic algorithm implementations.

/// Hash functions.
pub mod hash;
