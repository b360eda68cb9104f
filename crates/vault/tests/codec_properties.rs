//! Property-based tests for the delivery secret codec.
//!
//! 1. **Round-trip**: every UTF-8 string decrypts back to itself
//! 2. **Freshness**: repeated encryptions never share an IV
//! 3. **Tamper detection**: any single flipped byte is rejected
//! 4. **Fail-soft reveal**: `safe_decrypt` never panics on arbitrary JSON

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::EncryptedPayload;
use delivery_vault::crypto::{CodecError, SecretCodec, IV_LEN, TAG_LEN};
use proptest::prelude::*;
use serde_json::{json, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn codec() -> SecretCodec {
    SecretCodec::from_secret("test-secret-value")
}

fn flip_byte(b64: &str, index: usize) -> String {
    let mut bytes = STANDARD.decode(b64).expect("codec output is valid base64");
    bytes[index] ^= 0x80;
    STANDARD.encode(bytes)
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Iv,
    Ciphertext,
    Tag,
}

fn tampered(payload: &EncryptedPayload, field: Field, index: usize) -> EncryptedPayload {
    let mut p = payload.clone();
    match field {
        Field::Iv => p.initialization_vector = flip_byte(&p.initialization_vector, index % IV_LEN),
        Field::Tag => p.authentication_tag = flip_byte(&p.authentication_tag, index % TAG_LEN),
        Field::Ciphertext => {
            let len = STANDARD.decode(&p.ciphertext).unwrap().len();
            p.ciphertext = flip_byte(&p.ciphertext, index % len);
        }
    }
    p
}

// ─────────────────────────────────────────────────────────────────────────────
// Proptest Strategies
// ─────────────────────────────────────────────────────────────────────────────

/// Arbitrary JSON values a document store might hand back.
fn stored_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            (any::<String>(), any::<String>(), any::<String>()).prop_map(|(iv, ct, tag)| {
                json!({"initializationVector": iv, "ciphertext": ct, "authenticationTag": tag})
            }),
            prop::collection::hash_map("[a-zA-Z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strings of at least 5,000 characters, including multi-byte ones.
fn long_text() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 5_000..12_000).prop_map(|chars| chars.into_iter().collect())
}

fn field() -> impl Strategy<Value = Field> {
    prop_oneof![Just(Field::Iv), Just(Field::Ciphertext), Just(Field::Tag)]
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_round_trip(plaintext in any::<String>()) {
        let codec = codec();
        let payload = codec.encrypt(&plaintext).unwrap();
        prop_assert_eq!(codec.decrypt(&payload).unwrap(), plaintext.clone());
        prop_assert_eq!(codec.safe_decrypt(&payload.to_value()), Some(plaintext));
    }

    #[test]
    fn prop_round_trip_long(plaintext in long_text()) {
        let codec = codec();
        let payload = codec.encrypt(&plaintext).unwrap();
        prop_assert_eq!(codec.decrypt(&payload).unwrap(), plaintext);
    }

    #[test]
    fn prop_fresh_iv_per_call(plaintext in any::<String>()) {
        let codec = codec();
        let a = codec.encrypt(&plaintext).unwrap();
        let b = codec.encrypt(&plaintext).unwrap();
        prop_assert_ne!(a.initialization_vector, b.initialization_vector);
    }

    #[test]
    fn prop_tamper_detected(
        plaintext in ".{1,64}",
        field in field(),
        index in any::<usize>(),
    ) {
        let codec = codec();
        let payload = codec.encrypt(&plaintext).unwrap();
        let bad = tampered(&payload, field, index);
        prop_assert!(matches!(codec.decrypt(&bad), Err(CodecError::Integrity)));
        prop_assert_eq!(codec.safe_decrypt(&bad.to_value()), None);
    }

    #[test]
    fn prop_wrong_secret_rejected(plaintext in any::<String>(), other in "[a-z]{1,32}") {
        prop_assume!(other != "test-secret-value");
        let payload = codec().encrypt(&plaintext).unwrap();
        prop_assert!(SecretCodec::from_secret(&other).decrypt(&payload).is_err());
    }

    #[test]
    fn prop_safe_decrypt_total(value in stored_value()) {
        let revealed = codec().safe_decrypt(&value);
        match &value {
            Value::String(s) => prop_assert_eq!(revealed.as_deref(), Some(s.as_str())),
            _ => prop_assert!(revealed.is_none()),
        }
    }
}
