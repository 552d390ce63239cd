//! Hashing System - SHA-256 Submission Digests
//!
//! A digest identifies one submission independent of JSON key order, so the
//! review stage and logs can refer to the same payload.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::submission::SubmissionRecord;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// digest = sha256(canonical_json(record))
pub fn submission_digest(record: &SubmissionRecord) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(record)?;
    Ok(sha256_hex(canonical.as_bytes()))
}
