mod tools;

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use prlens_tools::ToolFacade;

#[derive(Clone)]
pub struct AppState {
    /// Held for the whole invocation so calls never overlap
    pub facade: Arc<Mutex<ToolFacade>>,
}

pub fn create_router(facade: ToolFacade) -> Router {
    let state = AppState {
        facade: Arc::new(Mutex::new(facade)),
    };

    Router::new()
        .route("/api/health", get(tools::health))
        .route("/api/tools", get(tools::list_tools))
        .route("/api/tools/{name}", post(tools::invoke_tool))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(router: Router, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;

    tracing::info!(%addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    eprintln!("\nShutting down...");
}
