use crate::auction::model::{Auction, User};
use crate::bidding::model::{Alert, Bid};
use crate::fraud::RiskLevel;
use serde::{Deserialize, Serialize};

/// 남은 시간이 포함된 경매
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionView {
    #[serde(flatten)]
    pub auction: Auction,
    pub time_remaining: i64,
}

/// 사용자 프로필
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub bid_history: Vec<Bid>,
    pub average_fraud_score: f64,
    pub recent_bid_count: usize,
}

/// 관리자 사용자 목록 항목
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    #[serde(flatten)]
    pub user: User,
    pub total_bids: usize,
    pub average_fraud_score: f64,
    pub suspicious_bids: usize,
}

/// 대시보드 사용자 항목
/// bid_count 는 저장된 입찰 수이다 (사용자 통계값이 아님).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub trust_score: u32,
    pub success_rate: u32,
    pub risk_level: RiskLevel,
    pub bid_count: usize,
    pub average_fraud_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_auctions: usize,
    pub active_auctions: usize,
    pub total_bids: usize,
    pub total_alerts: usize,
    pub critical_alerts: usize,
    pub high_risk_alerts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub recent_alerts: Vec<Alert>,
    pub auctions: Vec<Auction>,
    pub users: Vec<DashboardUser>,
}
