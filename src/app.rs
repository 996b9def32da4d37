/*
 * Responsibility
 * - Tracing / panic hook setup
 * - Load Config → assemble Router with middleware in a fixed order
 * - Serve with axum::serve() until SIGINT / SIGTERM
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware::{client_lib_version, cors, http, security_headers};

fn init_tracing() {
    // Prefer RUST_LOG if set, e.g. RUST_LOG=info,skills_service=debug,tower_http=debug
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

        // Development fails fast; production keeps serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()
        .inspect_err(|err| tracing::error!(error = %err, "failed to load configuration"))?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        app_env = ?config.app_env,
        addr = %config.addr,
        client_lib_version = ?config.client_lib.version(),
        upgrade_in_progress = config.client_lib.upgrade_in_progress(),
        "starting skills service"
    );

    let app = build_router(&config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn build_router(config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .fallback(fallback);

    with_middleware(router, config)
}

/// Layers wrap outward: each `apply` below sees the request before the ones
/// above it.
fn with_middleware(router: Router, config: &Config) -> Router {
    let router = cors::apply(router, config);
    let router = security_headers::apply(router);
    let router = http::apply(router);

    // Must run before authentication stages. Outermost, so responses built by
    // any other layer (413, 408, CORS preflight, 401) still carry the headers.
    client_lib_version::apply(router, config.client_lib.clone())
}

async fn fallback() -> AppError {
    AppError::not_found("route")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
