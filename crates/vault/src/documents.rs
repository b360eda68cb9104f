//! Sealing and revealing delivery fields inside order documents.
//!
//! Fields are addressed with dot-notation paths. Array fields use the `[]`
//! suffix, e.g. `items[].deliveryData` visits `deliveryData` on every element
//! of `items`. Paths that do not resolve are skipped.

use serde_json::Value;

use common::payload::StoredSecret;

use crate::crypto::{CodecError, RevealContext, SecretCodec};

/// Segments of a dot-notation field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

/// Parse a dot-notation path into a list of [`PathSegment`]s.
///
/// `"items[].deliveryData"` → `[Key("items"), ArrayItem, Key("deliveryData")]`.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if let Some(key) = part.strip_suffix("[]") {
            segments.push(PathSegment::Key(key.to_owned()));
            segments.push(PathSegment::ArrayItem);
        } else {
            segments.push(PathSegment::Key(part.to_owned()));
        }
    }
    segments
}

/// Outcome of [`reveal_fields`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RevealSummary {
    /// Leaves replaced by recovered plaintext.
    pub revealed: usize,
    /// Leaves replaced by `null` because they could not be recovered.
    pub unavailable: usize,
}

/// `paths` with repeats removed, first occurrence kept.
fn distinct<P: AsRef<str>>(paths: &[P]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(paths.len());
    for path in paths.iter().map(|p| p.as_ref()) {
        if !seen.contains(&path) {
            seen.push(path);
        }
    }
    seen
}

/// Visit every leaf reachable through `segments`, calling `f` on each.
fn visit_leaves<E>(
    value: &mut Value,
    segments: &[PathSegment],
    f: &mut dyn FnMut(&mut Value) -> Result<(), E>,
) -> Result<(), E> {
    let Some((head, rest)) = segments.split_first() else {
        return f(value);
    };

    match head {
        PathSegment::Key(key) => {
            if let Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    visit_leaves(child, rest, &mut *f)?;
                }
            }
        }
        PathSegment::ArrayItem => {
            if let Value::Array(arr) = value {
                for item in arr.iter_mut() {
                    visit_leaves(item, rest, &mut *f)?;
                }
            }
        }
    }
    Ok(())
}

/// Encrypt every plaintext string leaf at `paths` in place.
///
/// Leaves that already carry an encrypted payload, and non-string leaves,
/// are left untouched, so sealing twice is a no-op.
///
/// # Errors
///
/// Propagates the first [`CodecError`]; the document may then be partially sealed.
pub fn seal_fields<P: AsRef<str>>(
    document: &mut Value,
    paths: &[P],
    codec: &SecretCodec,
) -> Result<usize, CodecError> {
    let mut sealed = 0;
    for path in distinct(paths) {
        let segments = parse_path(path);
        visit_leaves::<CodecError>(document, &segments, &mut |leaf| {
            if let Value::String(plaintext) = leaf {
                let payload = codec.encrypt(plaintext)?;
                *leaf = payload.to_value();
                sealed += 1;
            }
            Ok(())
        })?;
    }
    Ok(sealed)
}

/// Replace every leaf at `paths` with its recovered plaintext, or `null`.
///
/// Never fails. Legacy plaintext strings are kept as they are; corrupted
/// payloads become `null` and are logged with `record_id` and the path.
pub fn reveal_fields<P: AsRef<str>>(
    document: &mut Value,
    paths: &[P],
    codec: &SecretCodec,
    record_id: Option<&str>,
) -> RevealSummary {
    let mut summary = RevealSummary::default();
    for path in distinct(paths) {
        let segments = parse_path(path);
        let ctx = RevealContext {
            record_id,
            field: Some(path),
        };
        let _ = visit_leaves::<std::convert::Infallible>(document, &segments, &mut |leaf| {
            if let Value::String(_) = leaf {
                summary.revealed += 1;
                return Ok(());
            }
            match codec.reveal(StoredSecret::classify(leaf), ctx) {
                Some(plaintext) => {
                    *leaf = Value::String(plaintext);
                    summary.revealed += 1;
                }
                None => {
                    *leaf = Value::Null;
                    summary.unavailable += 1;
                }
            }
            Ok(())
        });
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::is_encrypted_shape;
    use serde_json::json;

    const PATHS: [&str; 2] = ["deliveryData", "items[].deliveryData"];

    fn codec() -> SecretCodec {
        SecretCodec::from_secret("test-secret-value")
    }

    #[test]
    fn parse_path_flat() {
        assert_eq!(parse_path("deliveryData"), vec![PathSegment::Key("deliveryData".into())]);
    }

    #[test]
    fn parse_path_nested() {
        assert_eq!(parse_path("fulfilment.delivery.key").len(), 3);
    }

    #[test]
    fn parse_path_array() {
        let segs = parse_path("items[].deliveryData");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1], PathSegment::ArrayItem);
    }

    #[test]
    fn seal_flat_and_array_fields() {
        let codec = codec();
        let mut doc = json!({
            "orderId": "o-1",
            "deliveryData": "AZ-1234-KEYX",
            "items": [
                {"name": "Game key", "deliveryData": "KEY-A"},
                {"name": "Account", "deliveryData": "login:pass"}
            ]
        });
        let sealed = seal_fields(&mut doc, &PATHS, &codec).unwrap();
        assert_eq!(sealed, 3);
        assert!(is_encrypted_shape(&doc["deliveryData"]));
        for item in doc["items"].as_array().unwrap() {
            assert!(is_encrypted_shape(&item["deliveryData"]));
        }
        assert_eq!(doc["orderId"], "o-1");
        assert_eq!(doc["items"][0]["name"], "Game key");
    }

    #[test]
    fn sealing_is_idempotent() {
        let codec = codec();
        let mut doc = json!({"deliveryData": "KEY"});
        seal_fields(&mut doc, &PATHS, &codec).unwrap();
        let first = doc.clone();
        assert_eq!(seal_fields(&mut doc, &PATHS, &codec).unwrap(), 0);
        assert_eq!(doc, first);
    }

    #[test]
    fn missing_field_is_noop() {
        let codec = codec();
        let mut doc = json!({"name": "Bob"});
        assert_eq!(seal_fields(&mut doc, &PATHS, &codec).unwrap(), 0);
        assert_eq!(doc, json!({"name": "Bob"}));
    }

    #[test]
    fn seal_without_secret_fails() {
        let mut doc = json!({"deliveryData": "KEY"});
        let err = seal_fields(&mut doc, &PATHS, &SecretCodec::unconfigured()).unwrap_err();
        assert!(matches!(err, CodecError::MissingSecret));
    }

    #[test]
    fn reveal_mixes_sealed_legacy_and_corrupted() {
        let codec = codec();
        let mut doc = json!({
            "deliveryData": "LEGACY-KEY",
            "items": [
                {"deliveryData": "NEW-KEY"},
                {"deliveryData": {"initializationVector": "a", "ciphertext": "b", "authenticationTag": "c"}},
                {"deliveryData": 42}
            ]
        });
        // Seal only the first item, leaving the legacy top-level value alone.
        seal_fields(&mut doc["items"][0], &["deliveryData"], &codec).unwrap();

        let summary = reveal_fields(&mut doc, &PATHS, &codec, Some("order-9"));
        assert_eq!(summary, RevealSummary { revealed: 2, unavailable: 2 });
        assert_eq!(doc["deliveryData"], "LEGACY-KEY");
        assert_eq!(doc["items"][0]["deliveryData"], "NEW-KEY");
        assert!(doc["items"][1]["deliveryData"].is_null());
        assert!(doc["items"][2]["deliveryData"].is_null());
    }

    #[test]
    fn repeated_paths_visit_each_leaf_once() {
        let codec = codec();
        let mut doc = json!({"deliveryData": "KEY"});
        let repeated = ["deliveryData", "deliveryData"];
        assert_eq!(seal_fields(&mut doc, &repeated, &codec).unwrap(), 1);

        let summary = reveal_fields(&mut doc, &repeated, &codec, None);
        assert_eq!(summary, RevealSummary { revealed: 1, unavailable: 0 });
        assert_eq!(doc["deliveryData"], "KEY");
    }

    #[test]
    fn reveal_without_secret_keeps_legacy_only() {
        let codec = codec();
        let mut doc = json!({"deliveryData": "KEY", "items": [{"deliveryData": "OLD"}]});
        seal_fields(&mut doc, &["deliveryData"], &codec).unwrap();

        let summary = reveal_fields(&mut doc, &PATHS, &SecretCodec::unconfigured(), None);
        assert_eq!(summary.revealed, 1);
        assert_eq!(summary.unavailable, 1);
        assert!(doc["deliveryData"].is_null());
        assert_eq!(doc["items"][0]["deliveryData"], "OLD");
    }
}
