//! Common types, persisted payload shapes, and errors shared across `delivery-vault` crates.

pub mod error;
pub mod payload;
pub mod protocol;

pub use error::ServiceError;
pub use payload::{is_encrypted_shape, EncryptedPayload, StoredSecret};
