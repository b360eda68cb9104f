//! Structured JSON logging, with optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No secret, key material, or delivery plaintext** may appear in any
//!   span attribute or log field. Decryption failures are logged with the
//!   error kind, record ID, and field path only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden
//!   by `RUST_LOG` when set.

pub mod init;

pub use init::init_telemetry;
