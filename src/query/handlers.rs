// region:    --- Imports
use super::views::{
    AdminUserView, AuctionView, Dashboard, DashboardSummary, DashboardUser, UserProfile,
};
use crate::auction::model::{Auction, AuctionStatus};
use crate::bidding::model::{Alert, Bid};
use crate::database::{Database, DatabaseManager};
use crate::error::{Error, Result};
use crate::fraud::RiskLevel;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- Constants
pub const DEFAULT_ALERT_LIMIT: usize = 50;
const DASHBOARD_RECENT_ALERTS: usize = 10;
const USER_BID_HISTORY: usize = 10;
const RECENT_BID_WINDOW_SECS: i64 = 3600;
// endregion: --- Constants

// region:    --- Query Handlers

/// 모든 경매 조회
pub async fn get_all_auctions(db_manager: &DatabaseManager) -> Vec<AuctionView> {
    info!("{:<12} --> 모든 경매 조회", "Query");
    let now = Utc::now();
    db_manager
        .read(|db| db.auctions().map(|a| auction_view(a, now)).collect())
        .await
}

/// 경매 조회
pub async fn get_auction(db_manager: &DatabaseManager, auction_id: &str) -> Result<AuctionView> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    let now = Utc::now();
    db_manager
        .read(|db| {
            db.auction(auction_id)
                .map(|a| auction_view(a, now))
                .ok_or_else(|| Error::AuctionNotFound(auction_id.to_string()))
        })
        .await
}

/// 사용자 프로필 조회
pub async fn get_user_profile(db_manager: &DatabaseManager, user_id: &str) -> Result<UserProfile> {
    info!("{:<12} --> 사용자 프로필 조회 id: {}", "Query", user_id);
    let now = Utc::now();
    db_manager
        .read(|db| user_profile(db, user_id, now))
        .await
}

/// 관리자 사용자 목록 조회
pub async fn get_admin_users(db_manager: &DatabaseManager) -> Vec<AdminUserView> {
    info!("{:<12} --> 관리자 사용자 목록 조회", "Query");
    db_manager.read(admin_users).await
}

/// 최근 알림 조회 (최신순)
pub async fn get_recent_alerts(db_manager: &DatabaseManager, limit: usize) -> Vec<Alert> {
    info!("{:<12} --> 최근 알림 조회 limit: {}", "Query", limit);
    db_manager
        .read(|db| recent_alerts(db.alerts(), limit))
        .await
}

/// 관리자 대시보드 조회
pub async fn get_dashboard(db_manager: &DatabaseManager) -> Dashboard {
    info!("{:<12} --> 대시보드 조회", "Query");
    db_manager.read(dashboard).await
}

// endregion: --- Query Handlers

// region:    --- Read Models

fn auction_view(auction: &Auction, now: DateTime<Utc>) -> AuctionView {
    AuctionView {
        auction: auction.clone(),
        time_remaining: auction.time_remaining(now),
    }
}

/// 평균 사기 점수, 입찰이 없으면 0
fn average_fraud_score<'a>(bids: impl IntoIterator<Item = &'a Bid>) -> f64 {
    let (sum, count) = bids
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), b| (sum + u64::from(b.fraud_score), count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

fn recent_alerts(alerts: &[Alert], limit: usize) -> Vec<Alert> {
    alerts.iter().rev().take(limit).cloned().collect()
}

pub fn user_profile(db: &Database, user_id: &str, now: DateTime<Utc>) -> Result<UserProfile> {
    let user = db
        .user(user_id)
        .ok_or_else(|| Error::UserNotFound(user_id.to_string()))?;
    let bids: Vec<&Bid> = db.bids_by_user(user_id).collect();
    let window = Duration::seconds(RECENT_BID_WINDOW_SECS);

    Ok(UserProfile {
        user: user.clone(),
        bid_history: bids
            .iter()
            .skip(bids.len().saturating_sub(USER_BID_HISTORY))
            .map(|b| (*b).clone())
            .collect(),
        average_fraud_score: average_fraud_score(bids.iter().copied()),
        recent_bid_count: bids.iter().filter(|b| now - b.timestamp < window).count(),
    })
}

pub fn admin_users(db: &Database) -> Vec<AdminUserView> {
    db.users()
        .map(|user| {
            let bids: Vec<&Bid> = db.bids_by_user(&user.id).collect();
            AdminUserView {
                user: user.clone(),
                total_bids: bids.len(),
                average_fraud_score: average_fraud_score(bids.iter().copied()),
                suspicious_bids: bids.iter().filter(|b| b.risk_level != RiskLevel::Low).count(),
            }
        })
        .collect()
}

pub fn dashboard(db: &Database) -> Dashboard {
    let alerts = db.alerts();
    let summary = DashboardSummary {
        total_auctions: db.auctions().count(),
        active_auctions: db
            .auctions()
            .filter(|a| a.status == AuctionStatus::Active)
            .count(),
        total_bids: db.bid_count(),
        total_alerts: alerts.len(),
        critical_alerts: alerts
            .iter()
            .filter(|a| a.severity == RiskLevel::Critical)
            .count(),
        high_risk_alerts: alerts
            .iter()
            .filter(|a| matches!(a.severity, RiskLevel::Critical | RiskLevel::High))
            .count(),
    };

    let users = db
        .users()
        .map(|u| {
            let bids: Vec<&Bid> = db.bids_by_user(&u.id).collect();
            DashboardUser {
                id: u.id.clone(),
                name: u.name.clone(),
                email: u.email.clone(),
                trust_score: u.trust_score,
                success_rate: u.success_rate,
                risk_level: u.risk_level,
                bid_count: bids.len(),
                average_fraud_score: average_fraud_score(bids.iter().copied()),
            }
        })
        .collect();

    Dashboard {
        summary,
        recent_alerts: recent_alerts(alerts, DASHBOARD_RECENT_ALERTS),
        auctions: db.auctions().cloned().collect(),
        users,
    }
}

// endregion: --- Read Models
