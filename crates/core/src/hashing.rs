//! SHA-256 digests for secrets that are compared but never read back
//! (session tokens, two-factor backup codes).

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Digest an opaque token for storage and lookup.
pub fn hash_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}
