//! Snapshot identity.
//!
//! A SHA-256 digest over the canonical JSON of a snapshot's fields gives the
//! pipeline a cheap way to tell whether anything changed since the last
//! computation. The timestamp is excluded on purpose: a re-delivered
//! snapshot with identical samples hashes the same.

use sha2::{Digest, Sha256};

use crate::api::FarmSnapshot;

/// Hex-encoded SHA-256 digest of the snapshot's field data.
pub fn snapshot_checksum(snapshot: &FarmSnapshot) -> String {
    let mut hasher = Sha256::new();
    // Field serialization is deterministic: struct fields serialize in
    // declaration order and the vectors are ordered inputs.
    for field in &snapshot.fields {
        let json = serde_json::to_string(field).unwrap_or_default();
        hasher.update(json.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
