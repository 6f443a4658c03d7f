// region:    --- Imports
use crate::bidding::commands::{handle_place_bid, PlaceBidCommand};
use crate::query;
use crate::query::handlers::DEFAULT_ALERT_LIMIT;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State((db_manager, broadcaster)): State<AppState>,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청: {:?}", "HandlerCmd", cmd);

    match handle_place_bid(cmd, &db_manager, broadcaster.as_ref()).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 경매 조회
pub async fn handle_get_auctions(State((db_manager, _)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 모든 경매 조회", "HandlerQuery");
    Json(query::handlers::get_all_auctions(&db_manager).await)
}

/// 경매 조회
pub async fn handle_get_auction(
    State((db_manager, _)): State<AppState>,
    Path(auction_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", auction_id);
    match query::handlers::get_auction(&db_manager, &auction_id).await {
        Ok(auction) => Json(auction).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 사용자 프로필 조회
pub async fn handle_get_user(
    State((db_manager, _)): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("{:<12} --> 사용자 조회 id: {}", "HandlerQuery", user_id);
    match query::handlers::get_user_profile(&db_manager, &user_id).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 알림 조회 파라미터
#[derive(Debug, Deserialize)]
pub struct AlertsParams {
    pub limit: Option<String>,
}

impl AlertsParams {
    /// 앞쪽 숫자만 읽는다 ("7abc" 는 7). 숫자가 없거나 0 이하면 기본값
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(leading_number)
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_ALERT_LIMIT)
    }
}

fn leading_number(raw: &str) -> Option<usize> {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    raw[..end].parse().ok()
}

/// 최근 알림 조회
pub async fn handle_get_alerts(
    State((db_manager, _)): State<AppState>,
    Query(params): Query<AlertsParams>,
) -> impl IntoResponse {
    let limit = params.limit();
    info!("{:<12} --> 알림 조회 limit: {}", "HandlerQuery", limit);
    Json(query::handlers::get_recent_alerts(&db_manager, limit).await)
}

/// 관리자 사용자 목록
pub async fn handle_get_admin_users(State((db_manager, _)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 관리자 사용자 목록", "HandlerQuery");
    Json(query::handlers::get_admin_users(&db_manager).await)
}

/// 관리자 대시보드
pub async fn handle_get_dashboard(State((db_manager, _)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 관리자 대시보드", "HandlerQuery");
    Json(query::handlers::get_dashboard(&db_manager).await)
}

// endregion: --- Query Handlers
