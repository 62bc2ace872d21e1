// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the proof verifier and telemetry.
use serde::{Deserialize, Serialize};

/// Limits applied by the verifier to proofs received from untrusted peers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProofConfig {
    /// The longest path (number of inner nodes) a proof may carry.
    /// An AVL tree of 2^64 leaves is well under this depth.
    #[serde(default = "default_max_path_len")]
    pub max_path_len: usize,
    /// The largest encoded proof accepted before decoding is attempted.
    #[serde(default = "default_max_proof_bytes")]
    pub max_proof_bytes: usize,
}

fn default_max_path_len() -> usize {
    128
}
fn default_max_proof_bytes() -> usize {
    512 * 1024 // 512 KiB
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            max_path_len: default_max_path_len(),
            max_proof_bytes: default_max_proof_bytes(),
        }
    }
}

/// Selects how log records are rendered.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum LogFormat {
    /// One JSON object per line, for log shippers.
    #[default]
    Json,
    /// Human-readable, for local development.
    Pretty,
}

/// Configuration for the global `tracing` subscriber.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// The output format of log records.
    #[serde(default)]
    pub log_format: LogFormat,
    /// The filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            default_filter: default_filter(),
        }
    }
}
