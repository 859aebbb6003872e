pub mod config;
pub mod game;
pub mod ws;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use ws::GameServer;

pub fn create_app(server: Arc<GameServer>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(server)
}
