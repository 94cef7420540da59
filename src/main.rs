use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use models::auth::{ConfigSource, get_app_auth_mode};
use services::{
    memory_store::MemoryStore, object_storage::ObjectStorageService, signer::UrlSigner,
};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting object-gateway with config: {:?}", cfg);

    // --- Resolve auth mode ---
    let auth_mode = get_app_auth_mode(&cfg);
    tracing::info!("Authentication mode: {}", auth_mode);

    // --- Initialize storage ---
    let bucket = cfg.get(config::BUCKET).unwrap_or_else(|| cfg.bucket.clone());
    let key_prefix = cfg.get(config::KEY_PREFIX).unwrap_or_default();
    let signer = Arc::new(UrlSigner::new(
        bucket.clone(),
        cfg.public_url.clone(),
        cfg.signing_secret.clone(),
    ));
    let store = Arc::new(MemoryStore::new(bucket.clone(), signer.clone()));
    let storage = ObjectStorageService::new(store, bucket);
    tracing::debug!("Object keys anchored under prefix `{}`", key_prefix);

    // --- Build router ---
    let state = AppState::new(storage, signer, key_prefix, auth_mode);
    let app: Router = routes::routes::routes().with_state(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
