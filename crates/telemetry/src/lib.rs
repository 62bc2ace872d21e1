// Path: crates/telemetry/src/lib.rs
//! # AVL Proof Telemetry Crate Lints
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
//! # AVL Proof Telemetry
//!
//! Structured logging setup for processes that build or verify proofs.

/// Global subscriber initialisation.
pub mod init;

pub use init::init_tracing;
