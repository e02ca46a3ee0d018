//!
//! Bearer-token authentication service.
//! Reads configuration from TOML file (~/.config/authgate/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use authgate::auth::{AnyCredentials, CredentialVerifier, KeyMaterial, TokenIssuer, TokenValidator};
use authgate::{create_api_router, default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("AUTHGATE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default().with_env_overrides()
        }
    };

    info!("Starting Authgate...");

    // ── Key material (fatal if the secret is missing or weak) ──
    let keys = Arc::new(KeyMaterial::from_config(&app_cfg.security)?);
    info!(
        "JWT configured: issuer '{}', {}s token validity, {}s clock skew",
        keys.issuer(),
        keys.validity_secs(),
        keys.clock_skew_secs()
    );

    let issuer = TokenIssuer::new(keys.clone());
    let validator = TokenValidator::new(keys);

    // Credential checking is an external concern; the built-in verifier
    // accepts any non-empty username and grants no roles.
    let credentials: Arc<dyn CredentialVerifier> = Arc::new(AnyCredentials);

    // ── REST API server with graceful shutdown ─────────────────
    let router = create_api_router(issuer, validator, credentials);

    let addr = app_cfg.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Authgate shutdown complete");
    Ok(())
}
