//! Configuration loading and validation for the vault service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.
//! The encryption secret itself is optional here: without it the service
//! still reveals legacy plaintext, and every encrypt/decrypt call fails.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::SecretCodec;

/// Validated vault service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Operator-supplied secret the AES key is derived from.
    #[serde(default)]
    pub delivery_encryption_key: Option<String>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Comma-separated document paths holding delivery data.
    #[serde(default = "default_sealed_fields")]
    pub sealed_fields: String,

    /// OTLP endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_sealed_fields() -> String {
    "deliveryData,items[].deliveryData".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Document paths parsed from `SEALED_FIELDS`, in declaration order.
    ///
    /// Repeated paths are kept once, at their first position.
    pub fn sealed_field_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        for path in self.sealed_fields.split(',').map(str::trim) {
            if !path.is_empty() && !paths.iter().any(|p| p == path) {
                paths.push(path.to_owned());
            }
        }
        paths
    }

    /// Build the codec keyed by the configured secret, if any.
    pub fn codec(&self) -> SecretCodec {
        SecretCodec::new(self.delivery_encryption_key.as_deref())
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        let paths = self.sealed_field_paths();
        if paths.is_empty() {
            anyhow::bail!("SEALED_FIELDS must name at least one document path");
        }
        if let Some(bad) = paths
            .iter()
            .find(|p| p.split('.').any(|seg| seg.is_empty() || seg == "[]"))
        {
            anyhow::bail!("SEALED_FIELDS contains an invalid path: {bad:?}");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "delivery_encryption_key",
                &self.delivery_encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("listen_port", &self.listen_port)
            .field("sealed_fields", &self.sealed_fields)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}
