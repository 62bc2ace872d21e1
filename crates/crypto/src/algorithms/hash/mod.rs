// Path: crates/crypto/src/algorithms/hash/mod.rs
//! Cryptographic hash functions using the RustCrypto `ripemd` crate.

use ripemd::{Digest, Ripemd160};

/// Create a RIPEMD-160 hash of any type that can be referenced as bytes.
///
/// Returns the fixed-width digest; the output size is part of the type, so
/// there is no length to check at runtime.
pub fn ripemd160<T: AsRef<[u8]>>(data: T) -> [u8; 20] {
    let digest = Ripemd160::digest(data.as_ref());
    let mut out = [0u8; 20];
    out.copy_from_slice(digest.as_slice());
    out
}
