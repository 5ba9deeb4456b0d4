//! Single-route HTTP facade over the orchestrator.

use crate::browser::SessionController;
use crate::contest::ContestSource;
use crate::scrape::{Orchestrator, ScrapeResult};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

pub const SCRAPE_PATH: &str = "/scrape";

const SUCCESS_MESSAGE: &str = "Scraping completed successfully";
const FAILURE_MESSAGE: &str = "Failed to scrape rank data";

#[derive(Serialize)]
struct ScrapeResponse<'a> {
    message: &'static str,
    #[serde(flatten)]
    result: &'a ScrapeResult,
}

/// Failure body. Detail stays in the logs; clients only see the failure class.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    kind: &'static str,
}

/// Router with `GET /scrape`. Each request triggers its own independent scrape run.
pub fn router<R, C>(orchestrator: Arc<Orchestrator<R, C>>) -> Router
where
    R: ContestSource + 'static,
    C: SessionController,
{
    Router::new().route(SCRAPE_PATH, get(scrape::<R, C>)).with_state(orchestrator)
}

async fn scrape<R, C>(State(orchestrator): State<Arc<Orchestrator<R, C>>>) -> Response
where
    R: ContestSource + 'static,
    C: SessionController,
{
    match orchestrator.run().await {
        Ok(result) => Json(ScrapeResponse { message: SUCCESS_MESSAGE, result: &result }).into_response(),
        Err(e) => {
            log::error!("GET {} failed: {}", SCRAPE_PATH, e);
            let body = ErrorResponse { error: FAILURE_MESSAGE, kind: e.kind() };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl-C
pub async fn serve<R, C>(orchestrator: Orchestrator<R, C>, port: u16) -> std::io::Result<()>
where
    R: ContestSource + 'static,
    C: SessionController,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}{}", listener.local_addr()?, SCRAPE_PATH);

    axum::serve(listener, router(Arc::new(orchestrator)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
