//! Query fingerprinting for memoization and request coalescing

use sha2::{Digest, Sha256};

/// Generate a short hash from a built query string.
/// Returns a 16-character hex string (64-bit hash).
///
/// Callers key caches and "same as last request" checks on this value, so
/// it depends only on the exact bytes of `query`.
#[must_use]
pub fn query_fingerprint(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    let bytes = hasher.finalize();
    hex::encode(&bytes[..8]) // Take first 8 bytes for 64-bit hash
}

/// Fingerprint scoped to an entity path, so identical query strings against
/// different collections do not collide.
#[must_use]
pub fn scoped_fingerprint(entity_path: &str, query: &str) -> String {
    query_fingerprint(&format!("{entity_path}?{query}"))
}
