//! JSON encoding helpers mapped onto the series error surface.

use flux_core::errors::{ErrorInfo, SeriesError, SeriesResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn map_err(err: serde_json::Error, code: &str) -> SeriesError {
    SeriesError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Serialises a value to compact JSON bytes with struct fields in declaration order.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> SeriesResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| map_err(err, "series-serialize"))
}

/// Serialises a value to indented JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> SeriesResult<String> {
    serde_json::to_string_pretty(value).map_err(|err| map_err(err, "series-serialize"))
}

/// Restores a value from JSON bytes, re-running construction checks.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> SeriesResult<T> {
    serde_json::from_slice(bytes).map_err(|err| map_err(err, "series-deserialize"))
}
