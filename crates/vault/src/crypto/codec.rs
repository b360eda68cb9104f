//! [`SecretCodec`]: encrypt, decrypt, and safely reveal delivery secrets.
//!
//! **Algorithm:** AES-256-GCM with a fresh 128-bit random IV per call and a
//! detached 128-bit tag. GCM nonce reuse under one key is catastrophic, so the
//! IV is never derived from the plaintext or reused.
//!
//! `encrypt` and `decrypt` fail loud. `safe_decrypt` is the boundary for data
//! of uncertain provenance: it never fails and reports problems to the log.

use std::sync::Arc;

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, AeadInPlace, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce, Tag,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::payload::{EncryptedPayload, StoredSecret};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::key::SecretKey;

/// Byte length of the random initialization vector.
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// AES-256-GCM keyed for a 128-bit IV.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Errors produced by the codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No encryption secret is configured.
    #[error("encryption secret is not configured")]
    MissingSecret,

    /// Tag verification failed: tampered, corrupted, or sealed under another key.
    #[error("authentication tag verification failed")]
    Integrity,

    /// A field is not valid base64, has the wrong length, or the plaintext is not UTF-8.
    #[error("malformed payload: {0}")]
    Malformed(&'static str),
}

impl CodecError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CodecError::MissingSecret => "configuration",
            CodecError::Integrity => "integrity",
            CodecError::Malformed(_) => "malformed",
        }
    }
}

/// Identifying context attached to safe-decrypt diagnostics.
///
/// Never carries the secret or any plaintext.
#[derive(Debug, Default, Clone, Copy)]
pub struct RevealContext<'a> {
    /// Identifier of the owning record (e.g. an order ID).
    pub record_id: Option<&'a str>,
    /// Path of the field within the record.
    pub field: Option<&'a str>,
}

/// Converts between delivery secrets and their stored [`EncryptedPayload`] form.
///
/// Holds the derived key behind an `Arc`, so clones are cheap and may be
/// shared across request handlers without locking.
#[derive(Clone, Debug)]
pub struct SecretCodec {
    key: Option<Arc<SecretKey>>,
}

impl SecretCodec {
    /// Build a codec from an optional secret.
    ///
    /// An absent or empty secret leaves the codec unconfigured: `encrypt` and
    /// `decrypt` then fail with [`CodecError::MissingSecret`].
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            key: secret
                .filter(|s| !s.is_empty())
                .map(|s| Arc::new(SecretKey::derive(s))),
        }
    }

    /// Build a codec keyed by `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self::new(Some(secret))
    }

    /// Build a codec with no secret configured.
    pub fn unconfigured() -> Self {
        Self { key: None }
    }

    /// Returns `true` if a secret is configured.
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Encrypt a delivery secret for storage.
    ///
    /// Two calls with the same plaintext yield different IVs and ciphertexts.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingSecret`] if no secret is configured.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedPayload, CodecError> {
        let cipher = self.cipher()?;

        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| CodecError::Malformed("plaintext exceeds cipher limits"))?;

        Ok(EncryptedPayload {
            initialization_vector: STANDARD.encode(iv),
            ciphertext: STANDARD.encode(&buffer),
            authentication_tag: STANDARD.encode(tag),
        })
    }

    /// Decrypt and verify a stored payload.
    ///
    /// Either the fully verified plaintext is returned or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingSecret`] if no secret is configured,
    /// [`CodecError::Malformed`] for bad base64 or field lengths, and
    /// [`CodecError::Integrity`] if the tag does not verify.
    pub fn decrypt(&self, payload: &EncryptedPayload) -> Result<String, CodecError> {
        let cipher = self.cipher()?;

        let iv = STANDARD
            .decode(&payload.initialization_vector)
            .map_err(|_| CodecError::Malformed("initialization vector is not valid base64"))?;
        if iv.len() != IV_LEN {
            return Err(CodecError::Malformed("initialization vector must be 16 bytes"));
        }
        let tag = STANDARD
            .decode(&payload.authentication_tag)
            .map_err(|_| CodecError::Malformed("authentication tag is not valid base64"))?;
        if tag.len() != TAG_LEN {
            return Err(CodecError::Malformed("authentication tag must be 16 bytes"));
        }
        let mut buffer = STANDARD
            .decode(&payload.ciphertext)
            .map_err(|_| CodecError::Malformed("ciphertext is not valid base64"))?;

        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&iv),
                b"",
                &mut buffer,
                Tag::<U16>::from_slice(&tag),
            )
            .map_err(|_| CodecError::Integrity)?;

        String::from_utf8(buffer).map_err(|_| CodecError::Malformed("plaintext is not valid UTF-8"))
    }

    /// Recover a stored delivery value of unknown shape. Never fails.
    ///
    /// - encrypted payload → plaintext, or `None` if it does not decrypt
    /// - bare string → returned verbatim (legacy plaintext)
    /// - anything else → `None`
    pub fn safe_decrypt(&self, value: &Value) -> Option<String> {
        self.safe_decrypt_with_context(value, RevealContext::default())
    }

    /// [`safe_decrypt`](Self::safe_decrypt) with record context for the failure log.
    pub fn safe_decrypt_with_context(&self, value: &Value, ctx: RevealContext<'_>) -> Option<String> {
        self.reveal(StoredSecret::classify(value), ctx)
    }

    /// Recover an already-classified stored value. Never fails.
    pub fn reveal(&self, stored: StoredSecret, ctx: RevealContext<'_>) -> Option<String> {
        match stored {
            StoredSecret::Plaintext(legacy) => Some(legacy),
            StoredSecret::Encrypted(payload) => match self.decrypt(&payload) {
                Ok(plaintext) => Some(plaintext),
                Err(e) => {
                    warn!(
                        error = %e,
                        kind = e.kind(),
                        record_id = ctx.record_id,
                        field = ctx.field,
                        "delivery data could not be decrypted"
                    );
                    None
                }
            },
            StoredSecret::Unknown => None,
        }
    }

    fn cipher(&self) -> Result<Aes256Gcm16, CodecError> {
        let key = self.key.as_deref().ok_or(CodecError::MissingSecret)?;
        Ok(Aes256Gcm16::new(key.as_bytes().into()))
    }
}
