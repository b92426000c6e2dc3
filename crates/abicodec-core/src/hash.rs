//! keccak-256, the only cryptographic primitive the codec consumes.
//!
//! Used for function selectors (`keccak256(sig)[..4]`) and event topics
//! (`keccak256(sig)`); the hash itself is a dependency, not codec logic.

use tiny_keccak::{Hasher, Keccak};

/// Compute the keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}
