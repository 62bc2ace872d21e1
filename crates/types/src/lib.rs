// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # AVL Proof Types
//!
//! Foundational library for the AVL proof workspace: error enums, configuration
//! objects and the canonical binary codec shared by every other crate.
//!
//! ## Architectural Role
//!
//! As the base crate, `avlproof-types` has minimal dependencies and is a
//! dependency of the `crypto`, `state` and `telemetry` crates. Keeping the
//! error and config definitions here gives every component one stable
//! vocabulary for failure kinds and limits.

/// The width in bytes of every node and root hash (RIPEMD-160).
pub const HASH_LEN: usize = 20;

/// A fixed-width digest identifying a tree node or a tree root.
pub type NodeHash = [u8; HASH_LEN];

/// The canonical, deterministic binary codec for proof objects.
pub mod codec;
/// Configuration structures for the verifier and for telemetry.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// A prelude containing useful extension traits like `OptionExt`.
pub mod prelude;
