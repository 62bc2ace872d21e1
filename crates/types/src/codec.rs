// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for proof objects.
//!
//! Thin wrappers around `parity-scale-codec` (SCALE). Proofs cross process and
//! machine boundaries, so every component encodes and decodes them through
//! these two functions and nowhere else.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Vec<u8> {
    v.encode()
}

/// Decodes a value from its canonical SCALE byte representation.
///
/// Fails on any decoding error, including trailing bytes left after the value.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Encode, Decode, Debug, PartialEq, Eq)]
    struct Sample {
        height: i8,
        hash: [u8; 20],
        key: Vec<u8>,
    }

    #[test]
    fn test_canonical_codec_roundtrip() {
        let original = Sample {
            height: 3,
            hash: [7u8; 20],
            key: b"key".to_vec(),
        };

        let encoded = to_bytes_canonical(&original);
        let decoded = from_bytes_canonical::<Sample>(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_canonical_codec_rejects_trailing_bytes() {
        let mut encoded = to_bytes_canonical(&Sample {
            height: 1,
            hash: [0u8; 20],
            key: Vec::new(),
        });
        encoded.push(0xAA);

        let err = from_bytes_canonical::<Sample>(&encoded).unwrap_err();
        assert!(err.contains("canonical decode failed"));
    }

    #[test]
    fn test_canonical_codec_rejects_truncation() {
        let encoded = to_bytes_canonical(&Sample {
            height: 1,
            hash: [9u8; 20],
            key: b"abc".to_vec(),
        });
        let truncated = &encoded[..encoded.len() - 1];
        assert!(from_bytes_canonical::<Sample>(truncated).is_err());
    }
}
