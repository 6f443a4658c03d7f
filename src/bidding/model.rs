use crate::auction::model::User;
use crate::fraud::{FraudAnalysis, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 입찰 모델
// 사기 점수와 위험 등급은 제출 시점의 스냅샷이며 이후 재계산하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub auction_id: String,
    pub user_id: String,
    pub amount: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub fraud_score: u32,
    pub risk_level: RiskLevel,
}

// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    FraudBlocked,
    SuspiciousBid,
}

// 알림 모델
// 차단된 입찰은 Bid 가 생성되지 않으므로 bid_id 가 없다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: RiskLevel,
    pub message: String,
    pub bid_id: Option<String>,
    pub user_id: String,
    pub auction_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub fraud_analysis: FraudAnalysis,
}

impl Alert {
    /// 차단 알림 (항상 CRITICAL)
    pub fn fraud_blocked(
        user: &User,
        auction_id: &str,
        analysis: &FraudAnalysis,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            alert_type: AlertType::FraudBlocked,
            severity: RiskLevel::Critical,
            message: format!(
                "Bid from {} blocked due to fraud detection (Score: {})",
                user.name, analysis.total_score
            ),
            bid_id: None,
            user_id: user.id.clone(),
            auction_id: auction_id.to_string(),
            timestamp: now,
            fraud_analysis: analysis.clone(),
        }
    }

    /// 의심 입찰 알림 (입찰은 수락됨)
    pub fn suspicious_bid(
        user: &User,
        auction_id: &str,
        bid_id: &str,
        analysis: &FraudAnalysis,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            alert_type: AlertType::SuspiciousBid,
            severity: analysis.risk_level,
            message: format!(
                "Suspicious bid from {} - Score: {}",
                user.name, analysis.total_score
            ),
            bid_id: Some(bid_id.to_string()),
            user_id: user.id.clone(),
            auction_id: auction_id.to_string(),
            timestamp: now,
            fraud_analysis: analysis.clone(),
        }
    }
}
