//! Persisted shapes of a delivery-data field.
//!
//! A delivery field on an order record is either an [`EncryptedPayload`]
//! object or, for records written before encryption was introduced, the bare
//! plaintext string. [`StoredSecret`] classifies whatever was read back so
//! callers can match on it exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON key holding the base64 initialization vector.
pub const INITIALIZATION_VECTOR_KEY: &str = "initializationVector";
/// JSON key holding the base64 ciphertext.
pub const CIPHERTEXT_KEY: &str = "ciphertext";
/// JSON key holding the base64 authentication tag.
pub const AUTHENTICATION_TAG_KEY: &str = "authenticationTag";

/// Text shown in place of delivery data that could not be recovered.
pub const UNAVAILABLE_PLACEHOLDER: &str = "delivery data unavailable";

/// At-rest representation of an encrypted delivery secret.
///
/// All three fields are standard base64 (with padding). The value is
/// self-contained: decrypting it needs only this payload and the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    /// Base64 of the 16 random IV bytes.
    pub initialization_vector: String,
    /// Base64 of the ciphertext bytes.
    pub ciphertext: String,
    /// Base64 of the 16-byte authentication tag.
    pub authentication_tag: String,
}

impl EncryptedPayload {
    /// Render this payload as the JSON object stored on the order record.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(3);
        map.insert(
            INITIALIZATION_VECTOR_KEY.into(),
            Value::String(self.initialization_vector.clone()),
        );
        map.insert(CIPHERTEXT_KEY.into(), Value::String(self.ciphertext.clone()));
        map.insert(
            AUTHENTICATION_TAG_KEY.into(),
            Value::String(self.authentication_tag.clone()),
        );
        Value::Object(map)
    }
}

/// Returns `true` if `value` is an object carrying all three payload fields as strings.
///
/// Purely structural: base64 validity and cipher correctness are not checked.
/// Extra keys on the object are ignored.
pub fn is_encrypted_shape(value: &Value) -> bool {
    match value {
        Value::Object(map) => [INITIALIZATION_VECTOR_KEY, CIPHERTEXT_KEY, AUTHENTICATION_TAG_KEY]
            .iter()
            .all(|key| map.get(*key).is_some_and(Value::is_string)),
        _ => false,
    }
}

/// A delivery-data value read back from storage, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSecret {
    /// Legacy unencrypted value.
    Plaintext(String),
    /// Something that looks like ciphertext. It may still fail to decrypt.
    Encrypted(EncryptedPayload),
    /// Null, numbers, arrays, objects of the wrong shape, and so on.
    Unknown,
}

impl StoredSecret {
    /// Classify an arbitrary JSON value.
    pub fn classify(value: &Value) -> Self {
        if is_encrypted_shape(value) {
            // Shape check guarantees all three are present strings.
            let field = |key: &str| {
                value
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned()
            };
            return StoredSecret::Encrypted(EncryptedPayload {
                initialization_vector: field(INITIALIZATION_VECTOR_KEY),
                ciphertext: field(CIPHERTEXT_KEY),
                authentication_tag: field(AUTHENTICATION_TAG_KEY),
            });
        }
        match value {
            Value::String(s) => StoredSecret::Plaintext(s.clone()),
            _ => StoredSecret::Unknown,
        }
    }
}

impl From<&Value> for StoredSecret {
    fn from(value: &Value) -> Self {
        Self::classify(value)
    }
}

/// Text to show a buyer for a recovered secret, or the unavailable placeholder.
pub fn display_or_unavailable(plaintext: Option<&str>) -> &str {
    plaintext.unwrap_or(UNAVAILABLE_PLACEHOLDER)
}
