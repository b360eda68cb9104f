//! `delivery-vault` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise telemetry (JSON logs, optional OTLP spans).
//! 3. Derive the codec key from the configured secret.
//! 4. Build the Axum router and start the HTTP server.

use anyhow::Result;
use tracing::{info, warn};

use delivery_vault::config::Config;
use delivery_vault::server::{router, state::AppState};
use delivery_vault::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "delivery-vault starting"
    );

    // -----------------------------------------------------------------------
    // 3. Codec
    // -----------------------------------------------------------------------
    let codec = cfg.codec();
    if !codec.is_configured() {
        warn!("DELIVERY_ENCRYPTION_KEY is not set; encrypt and decrypt will fail");
    }

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let sealed_fields = cfg.sealed_field_paths();
    info!(sealed_fields = ?sealed_fields, "delivery fields configured");
    let state = AppState::new(codec, sealed_fields);
    let app = router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
