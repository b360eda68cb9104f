//! `delivery-vault` — at-rest protection for order delivery secrets.
//!
//! The core is [`crypto::SecretCodec`]: AES-256-GCM encryption of short
//! secrets (license keys, credentials) into an [`common::EncryptedPayload`],
//! with a never-failing reveal path that passes legacy plaintext through.
//! [`documents`] applies the codec to fields inside order documents, and
//! [`server`] exposes both over HTTP.

pub mod config;
pub mod crypto;
pub mod documents;
pub mod server;
pub mod telemetry;

pub use crypto::{CodecError, SecretCodec};
