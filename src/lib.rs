// region:    --- Imports
use crate::database::DatabaseManager;
use crate::message_broker::Broadcaster;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

// region:    --- Modules
pub mod auction;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod fraud;
pub mod handlers;
pub mod message_broker;
pub mod query;
pub mod websocket;

// endregion: --- Modules

/// 핸들러 공유 상태 (저장소, 실시간 브로드캐스터)
pub type AppState = (Arc<DatabaseManager>, Arc<Broadcaster>);

/// 라우터 설정
pub fn app(state: AppState) -> Router {
    // 브라우저 클라이언트를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auctions", get(handlers::handle_get_auctions))
        .route("/api/auctions/:id", get(handlers::handle_get_auction))
        .route("/api/bids", post(handlers::handle_bid))
        .route("/api/users/:id", get(handlers::handle_get_user))
        .route("/api/alerts", get(handlers::handle_get_alerts))
        .route("/api/admin/users", get(handlers::handle_get_admin_users))
        .route("/api/admin/dashboard", get(handlers::handle_get_dashboard))
        .route("/", get(websocket::handle_ws))
        .route("/ws", get(websocket::handle_ws))
        .layer(cors)
        .with_state(state)
}
