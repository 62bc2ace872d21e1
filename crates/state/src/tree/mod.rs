// Path: crates/state/src/tree/mod.rs
//! # Authenticated State Trees
//!
//! This module exports the tree structures the proof layer is built on.

pub mod iavl;
