//! Content fingerprints for flattened envelopes.
//!
//! FINGERPRINT = "sha256:" || hex_lower(sha256(flattened bytes))
//!
//! This is an identity handle for logs and caches.  It is not carried on the
//! wire and is not an integrity check.

use sha2::{Digest, Sha256};

/// Compute `sha256:<lowercase hex>` over `data`.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let hex: String = result.iter().map(|b| format!("{:02x}", b)).collect();
    format!("sha256:{}", hex)
}
