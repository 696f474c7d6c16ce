/*
 * Responsibility
 * - Config読み込み → 依存生成 (provider client / validators / session store) → Router 組み立て
 * - Middleware の適用 (session / http)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::services::{
    augmenter::RequestAugmenter,
    cache::MemoryClient,
    provider::HttpProviderClient,
    session::{CacheSessionStore, SessionStore},
    validators::SchemaValidators,
};
use crate::state::{AppState, SessionSettings};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,viz_portal=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr は起動方法によっては見えないので tracing にも流す
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting viz-portal in {:?} mode on {} (provider: {})",
        config.app_env,
        config.addr,
        config.provider_url
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let provider = HttpProviderClient::new(&config.provider_url, config.provider_timeout)?;
    let augmenter = RequestAugmenter::new(Arc::new(provider), Arc::new(SchemaValidators::new()));

    let sessions: Arc<dyn SessionStore> = match &config.valkey_url {
        Some(url) => {
            let store = CacheSessionStore::connect(url).await?;
            tracing::info!(backend = store.backend_name(), "session store ready");
            Arc::new(store)
        }
        None => {
            tracing::warn!("VALKEY_URL not set; sessions are kept in memory");
            Arc::new(CacheSessionStore::new_with_cache(
                Arc::new(MemoryClient::new()),
                "session",
            ))
        }
    };

    Ok(AppState::new(
        augmenter,
        sessions,
        SessionSettings::from_config(config),
        config.request_body_limit_bytes,
    ))
}

/// Routes + session layer, without the HTTP-level layers (used directly by tests).
pub fn build_app(state: AppState) -> Router {
    let pages = middleware::session::apply(api::routes(state.clone()), state.clone());

    Router::new()
        .route("/health", get(health))
        .merge(pages)
        .with_state(state)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    middleware::http::apply(build_app(state), config)
}
