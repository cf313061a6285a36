//! Seed derivation for reproducible generation.
//!
//! Every record gets its own RNG seeded with `base + index`. Nested objects
//! and array items get a sub-seed derived from the enclosing seed and their
//! structural path, so sibling sub-records never share a seed and one
//! record's randomness never leaks into the next.

use crate::schema::SchemaPath;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

/// Seed for the record at `index` of a batch.
pub fn record_seed(base: u64, index: u64) -> u64 {
    base.wrapping_add(index)
}

/// Sub-seed for the node at `path`, relative to `parent` seed.
///
/// SHA-256 over the parent seed (little-endian) and the rendered path;
/// the first 8 bytes of the digest form the new seed.
pub fn derive(parent: u64, path: &SchemaPath) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(parent.to_le_bytes());
    hasher.update(path.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Fresh RNG handle for one unit of generation.
pub fn rng_for(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Resolve the batch base seed; `None` draws one from OS entropy.
pub fn resolve_base(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}
