use anyhow::{Context, Result};
use axum::{Router, middleware, routing::get};

use blogdex_core::{AppConfig, SearchService};

mod cors;
mod dto;
mod error;
mod handlers;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub(crate) struct WebState {
    pub(crate) service: SearchService,
}

impl WebState {
    fn new(service: SearchService) -> Self {
        Self { service }
    }
}

/// Start the search API server and block until shutdown.
///
/// # Errors
/// Returns an error when the runtime cannot be created, the socket cannot be
/// bound, or the server exits with a runtime failure.
pub fn serve_web(config: &AppConfig, host: &str, port: u16) -> Result<()> {
    let state = WebState::new(SearchService::from_config(config));
    let bind_addr = format!("{host}:{port}");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build web runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind web server at {bind_addr}"))?;
        tracing::info!(
            addr = %listener.local_addr()?,
            "search api listening on /api/search"
        );

        axum::serve(listener, app_router(state))
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("shutdown signal received");
            })
            .await
            .context("web server failed")
    })
}

pub(crate) fn app_router(state: WebState) -> Router {
    Router::new()
        .route(
            "/api/search",
            get(handlers::search)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .layer(middleware::from_fn(cors::cors_headers_middleware))
        .with_state(state)
}
