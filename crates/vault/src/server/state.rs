//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::SecretCodec;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying key material.
#[derive(Clone)]
pub struct AppState {
    /// Codec keyed by the configured secret (possibly unconfigured).
    pub codec: SecretCodec,
    /// Document paths treated as delivery fields.
    pub sealed_fields: Arc<Vec<String>>,
}

impl AppState {
    /// Create a new [`AppState`] from a codec and the sealed field paths.
    pub fn new(codec: SecretCodec, sealed_fields: Vec<String>) -> Self {
        Self {
            codec,
            sealed_fields: Arc::new(sealed_fields),
        }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with no secret, suitable for tests.
    fn default() -> Self {
        Self::new(
            SecretCodec::unconfigured(),
            vec!["deliveryData".into(), "items[].deliveryData".into()],
        )
    }
}
