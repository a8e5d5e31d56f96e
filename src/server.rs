use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use tower_http::trace::TraceLayer;

use crate::models::{RecommendResponse, Snapshot};
use crate::recommend;

/// Build the API router over a loaded snapshot. The snapshot is read-only
/// shared state, so concurrent requests are safe by construction.
pub fn router(snapshot: Arc<Snapshot>) -> Router {
    Router::new()
        .route("/api/beyond/recommend", get(recommend_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(snapshot)
}

/// "now" is read once at the HTTP boundary; everything below it is pure.
async fn recommend_handler(State(snapshot): State<Arc<Snapshot>>) -> Json<RecommendResponse> {
    Json(recommend::respond(&snapshot, Utc::now()))
}

pub async fn serve(snapshot: Snapshot, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(Arc::new(snapshot));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "serving recommendation API");
    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
