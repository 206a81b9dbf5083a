//! HTTP surface for renderers.
//!
//! - `GET /health` -- liveness
//! - `GET /api/scene` -- latest composed frame
//! - `GET /api/scene/stream` -- one SSE `scene` event per tick
//! - `GET /api/stats` -- counters for dashboards

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::routing::get;
use futures_util::Stream;
use mood_core::{EventBuffer, Scene};
use serde::Serialize;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub scenes: watch::Receiver<Arc<Scene>>,
    pub buffer: EventBuffer,
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub tick: u64,
    pub buffered: usize,
    pub retained: usize,
    pub clusters: usize,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/scene", get(get_scene))
        .route("/api/scene/stream", get(scene_stream))
        .route("/api/stats", get(get_stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_scene(State(state): State<Arc<AppState>>) -> Json<Scene> {
    let scene = state.scenes.borrow().as_ref().clone();
    Json(scene)
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<Stats> {
    let scene = state.scenes.borrow().clone();
    Json(Stats {
        tick: scene.tick,
        buffered: state.buffer.len(),
        retained: scene.retained_count,
        clusters: scene.cluster_markers.len(),
    })
}

async fn scene_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let mut rx = state.scenes.clone();
    let stream = async_stream::stream! {
        // Ends once the ticker drops its sender.
        while rx.changed().await.is_ok() {
            let json = rx.borrow_and_update().to_json();
            match json {
                Ok(data) => yield Ok(SseEvent::default().event("scene").data(data)),
                Err(e) => tracing::warn!("failed to encode scene: {e}"),
            }
        }
    };
    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
