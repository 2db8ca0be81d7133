use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StoreConfig};
use service::resources::{InMemoryResourceStore, ResourceStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Construct the store, seeding the sample resource when configured.
pub async fn build_state(cfg: &StoreConfig) -> AppState {
    let store = if cfg.seed_sample {
        let (store, _) = InMemoryResourceStore::with_sample().await;
        store
    } else {
        InMemoryResourceStore::new()
    };
    let store: Arc<dyn ResourceStore> = Arc::new(store);
    AppState::new(store)
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(mut cfg: AppConfig) -> anyhow::Result<()> {
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let state = build_state(&cfg.store).await;
    if state.store.is_empty().await {
        info!("resource store ready, empty");
    } else {
        let resources = state.store.len().await;
        info!(resources, "resource store ready");
    }
    let app = build_app(state);

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    let local: SocketAddr = listener.local_addr()?;
    info!(%local, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_state_respects_seed_flag() {
        let seeded = build_state(&StoreConfig { seed_sample: true }).await;
        assert_eq!(seeded.store.len().await, 1);

        let empty = build_state(&StoreConfig { seed_sample: false }).await;
        assert!(empty.store.is_empty().await);
    }

    #[tokio::test]
    async fn run_rejects_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        let err = run(cfg).await.expect_err("port 0 is invalid");
        assert!(matches!(
            err.downcast_ref::<StartupError>(),
            Some(StartupError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn run_reports_bind_failure() -> anyhow::Result<()> {
        let taken = TcpListener::bind("127.0.0.1:0").await?;
        let mut cfg = AppConfig::default();
        cfg.server.port = taken.local_addr()?.port();
        cfg.store.seed_sample = false;

        let err = run(cfg).await.expect_err("port already bound");
        assert!(matches!(
            err.downcast_ref::<StartupError>(),
            Some(StartupError::Bind { .. })
        ));
        Ok(())
    }
}
