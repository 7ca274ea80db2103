use flux_core::errors::SeriesResult;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::serde_io::to_canonical_json_bytes;

/// SHA-256 of the canonical JSON encoding, as lowercase hex.
pub fn canonical_hash<T: Serialize>(value: &T) -> SeriesResult<String> {
    let bytes = to_canonical_json_bytes(value)?;
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
