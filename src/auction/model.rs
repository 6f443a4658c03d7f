use crate::fraud::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 상태
// 코어는 ENDED 로 전이시키지 않는다. 종료 시각이 지나도 ACTIVE 로 남는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuctionStatus {
    Active,
    Ended,
}

// 경매 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub starting_price: i64,
    pub current_price: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    pub seller: String,
    pub highest_bidder: Option<String>,
    pub status: AuctionStatus,
    pub bids_count: u64,
}

impl Auction {
    /// 남은 시간(ms), 종료 후에는 0
    pub fn time_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.end_time - now).num_milliseconds().max(0)
    }

    /// 입찰 직후 클라이언트에 내려주는 요약 정보
    pub fn summary(&self) -> AuctionSummary {
        AuctionSummary {
            id: self.id.clone(),
            current_price: self.current_price,
            highest_bidder: self.highest_bidder.clone(),
            bids_count: self.bids_count,
        }
    }
}

// 경매 요약 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSummary {
    pub id: String,
    pub current_price: i64,
    pub highest_bidder: Option<String>,
    pub bids_count: u64,
}

// 사용자 모델
// trust_score, success_rate 는 사기 탐지의 정적 입력값이며 코어에서 재계산하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub trust_score: u32,
    pub bid_count: u64,
    pub success_rate: u32,
    pub risk_level: RiskLevel,
}
