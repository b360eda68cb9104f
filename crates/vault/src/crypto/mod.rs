//! AES-256-GCM at-rest encryption of delivery secrets.
//!
//! This module is intentionally free of HTTP dependencies. It provides the
//! codec used by the document layer and the request handlers.
//!
//! # Stored format
//!
//! ```text
//! {
//!   "initializationVector": "<base64(16 random bytes)>",
//!   "ciphertext":           "<base64(ciphertext)>",
//!   "authenticationTag":    "<base64(16-byte GCM tag)>"
//! }
//! ```
//!
//! A bare JSON string in the same field is legacy plaintext and is returned
//! verbatim by [`SecretCodec::safe_decrypt`].
//!
//! # Key
//!
//! The 32-byte key is the SHA-256 digest of the operator-supplied secret, so
//! the secret may have any length. Changing the secret makes every payload
//! sealed under the old one undecryptable.

pub mod codec;
pub mod key;

pub use codec::{CodecError, RevealContext, SecretCodec, IV_LEN, TAG_LEN};
pub use common::payload::is_encrypted_shape;
pub use key::{SecretKey, KEY_LEN};
