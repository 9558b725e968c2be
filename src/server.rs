//! HTTP surface: routes, extraction and the serve loop.

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::consts::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::error::HandlerError;
use crate::handler::InteractionHandler;
use crate::interaction::InteractionResponse;

/// Routes: interactions are accepted at `/` and `/api/interactions`, POST
/// only. `/health` answers `ok`.
pub fn router(handler: Arc<InteractionHandler>) -> Router {
    Router::new()
        .route("/", post(interactions))
        .route("/api/interactions", post(interactions))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

async fn interactions(
    State(handler): State<Arc<InteractionHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, HandlerError> {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    handler.handle(signature, timestamp, &body).await.map(Json)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, handler: Arc<InteractionHandler>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
