//! Request Fingerprints - SHA-256 over Canonical JSON
//!
//! Identical requests hash identically regardless of map key order, so
//! callers can memoize plans by hash.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    to_hex(&Sha256::digest(data))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Sorted keys, no whitespace.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    write_canonical(&serde_json::to_value(value)?, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) -> Result<(), serde_json::Error> {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_canonical(&map[key.as_str()], out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}

/// Digest of `platform_id:canonical_request:engine_version`. Bumping the
/// engine version invalidates every cached plan.
pub fn compute_request_hash(
    platform_id: &str,
    request: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(request)?;

    let mut hasher = Sha256::new();
    for (i, part) in [platform_id, canonical.as_str(), engine_version].into_iter().enumerate() {
        if i > 0 {
            hasher.update(b":");
        }
        hasher.update(part.as_bytes());
    }
    Ok(to_hex(&hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": {"y": 0, "b": 1}});
        assert_eq!(canonical_json(&obj).unwrap(), r#"{"a":2,"m":{"b":1,"y":0},"z":1}"#);
    }

    #[test]
    fn test_request_hash_ignores_key_order() {
        let a = json!({"canvasWidth": 1080, "canvasHeight": 1440});
        let b = json!({"canvasHeight": 1440, "canvasWidth": 1080});
        assert_eq!(
            compute_request_hash("xiaohongshu", &a, "1.0.0").unwrap(),
            compute_request_hash("xiaohongshu", &b, "1.0.0").unwrap()
        );
    }

    #[test]
    fn test_request_hash_depends_on_engine() {
        let req = json!({"canvasWidth": 1080});
        assert_ne!(
            compute_request_hash("jd", &req, "1.0.0").unwrap(),
            compute_request_hash("jd", &req, "1.1.0").unwrap()
        );
    }

    #[test]
    fn test_canonical_json_nested_arrays() {
        let obj = json!([{"b": [true, null], "a": "x\"y"}, 1.5]);
        assert_eq!(canonical_json(&obj).unwrap(), r#"[{"a":"x\"y","b":[true,null]},1.5]"#);
    }

    #[test]
    fn test_request_hash_layout() {
        let req = json!({"b": 1, "a": 2});
        assert_eq!(
            compute_request_hash("jd", &req, "1.0.0").unwrap(),
            sha256_hex(br#"jd:{"a":2,"b":1}:1.0.0"#)
        );
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
