use crate::auction::model::AuctionSummary;
use crate::bidding::model::Alert;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 서버 -> 클라이언트 실시간 메시지
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    // 신규 알림
    Alert { alert: Alert },
    // 입찰 수락
    BidPlaced {
        auction: AuctionSummary,
        message: String,
    },
    // 구독 확인
    #[serde(rename_all = "camelCase")]
    Subscribed {
        user_id: String,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        timestamp: DateTime<Utc>,
    },
}

/// 클라이언트 -> 서버 실시간 메시지
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Subscribe { user_id: String },
}
