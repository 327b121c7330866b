/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (PgPool, PublicRoutes, AuthGate) → Router 組み立て
 * - Middleware の適用 (auth gate は /health 以外の全 route + fallback、http は全体)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::repos::pool;
use crate::services::auth::{AuthGate, IdentityResolver, PgIdentityStore, PublicRoutes};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,token_gate=debug,tower_http=debug cargo run
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
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting token gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}

fn build_public_routes(config: &Config) -> Result<PublicRoutes> {
    let routes = if config.public_paths_lenient {
        PublicRoutes::lenient(&config.public_paths)
    } else {
        PublicRoutes::new(&config.public_paths).context("compiling PUBLIC_PATHS")?
    };

    if routes.is_empty() {
        tracing::warn!("no public routes configured; every path requires a token");
    }
    tracing::info!(
        patterns = routes.len(),
        lenient = config.public_paths_lenient,
        "public routes loaded"
    );
    Ok(routes)
}

async fn build_state(config: &Config) -> Result<AppState> {
    // allow-list を先に検証する (DB に繋ぐ前に設定ミスで落とす)
    let routes = build_public_routes(config)?;

    let db = pool::connect(config)
        .await
        .context("connecting to identity store")?;

    let store = PgIdentityStore::new(db, config.identity_table.clone());
    let resolver = IdentityResolver::new(Arc::new(store), config.auth_lookup_timeout);

    Ok(AppState::new(Arc::new(AuthGate::new(routes, resolver))))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let gated = middleware::auth::access::apply(api::routes(), state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .merge(gated)
        .with_state(state);

    middleware::http::apply(router, config.http_request_timeout)
}
