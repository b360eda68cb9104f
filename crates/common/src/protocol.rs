//! Request and response types exchanged with the vault service.
//!
//! These types are serialised as camelCase JSON over the HTTP API.

use serde::{Deserialize, Serialize};

use crate::payload::EncryptedPayload;

// ---------------------------------------------------------------------------
// Single-value endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Delivery secret to protect (license key, credentials, activation code).
    pub plaintext: String,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Payload to persist on the order record.
    pub payload: EncryptedPayload,
}

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Payload previously produced by `POST /encrypt`.
    pub payload: EncryptedPayload,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Verified plaintext.
    pub plaintext: String,
}

/// Request body for `POST /reveal`.
///
/// `value` is whatever was read back from storage: an encrypted payload, a
/// legacy plaintext string, or anything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealRequest {
    /// Stored field value of unknown provenance.
    #[serde(default)]
    pub value: serde_json::Value,
    /// Identifier of the owning record, attached to failure diagnostics.
    #[serde(default)]
    pub record_id: Option<String>,
}

/// Response body for `POST /reveal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealResponse {
    /// Recovered plaintext, or `null` when the value could not be recovered.
    pub plaintext: Option<String>,
    /// Text to render: the plaintext or the unavailable placeholder.
    pub display: String,
}

// ---------------------------------------------------------------------------
// Document endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /documents/seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealDocumentRequest {
    /// Order document whose configured delivery fields should be encrypted.
    pub document: serde_json::Value,
}

/// Response body for `POST /documents/seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealDocumentResponse {
    /// Document with plaintext delivery fields replaced by encrypted payloads.
    pub document: serde_json::Value,
    /// Number of fields newly sealed.
    pub sealed: usize,
}

/// Request body for `POST /documents/reveal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealDocumentRequest {
    /// Stored order document.
    pub document: serde_json::Value,
    /// Identifier of the order, attached to failure diagnostics.
    #[serde(default)]
    pub record_id: Option<String>,
}

/// Response body for `POST /documents/reveal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealDocumentResponse {
    /// Document with delivery fields replaced by plaintext or `null`.
    pub document: serde_json::Value,
    /// Number of fields recovered.
    pub revealed: usize,
    /// Number of fields that could not be recovered.
    pub unavailable: usize,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether an encryption secret is configured.
    pub codec_ready: bool,
    /// Number of document paths treated as delivery fields.
    pub sealed_fields: usize,
}
