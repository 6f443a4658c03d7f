/// 입찰 관련 커맨드 처리
/// 1. 경매/사용자 조회
/// 2. 가격 검증
/// 3. 사기 탐지 후 차단/의심/수락 분기
/// 4. 저장 및 실시간 알림
// region:    --- Imports
use crate::auction::events::ServerMessage;
use crate::auction::model::AuctionSummary;
use crate::bidding::model::{Alert, Bid};
use crate::database::{Database, DatabaseManager};
use crate::error::{Error, Result};
use crate::fraud::{FraudAnalysis, FraudDetector, Recommendation};
use crate::message_broker::EventPublisher;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidCommand {
    pub auction_id: String,
    pub user_id: String,
    pub amount: i64,
}

/// 입찰 성공 결과
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BidReceipt {
    pub success: bool,
    pub bid: Bid,
    pub auction: AuctionSummary,
    pub fraud_analysis: FraudAnalysis,
}

/// 입찰
///
/// 잠금을 잡은 상태로 전체 파이프라인을 실행하므로 입찰은 도착 순서대로 하나씩 처리된다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    db_manager: &DatabaseManager,
    publisher: &dyn EventPublisher,
) -> Result<BidReceipt> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let mut db = db_manager.lock().await;
    place_bid(&mut db, publisher, cmd, Utc::now())
}

/// 잠금 안에서 실행되는 입찰 파이프라인
///
/// 차단되면 저장소는 알림 로그 외에 변경되지 않는다.
pub fn place_bid(
    db: &mut Database,
    publisher: &dyn EventPublisher,
    cmd: PlaceBidCommand,
    now: DateTime<Utc>,
) -> Result<BidReceipt> {
    let auction = db
        .auction(&cmd.auction_id)
        .ok_or_else(|| Error::AuctionNotFound(cmd.auction_id.clone()))?;
    let user = db
        .user(&cmd.user_id)
        .ok_or_else(|| Error::UserNotFound(cmd.user_id.clone()))?;

    // 입찰 가격이 현재 가격보다 높은지 검증
    if cmd.amount <= auction.current_price {
        return Err(Error::BidTooLow {
            amount: cmd.amount,
            current_price: auction.current_price,
        });
    }

    // 새 입찰을 넣기 전에 과거 내역으로 평가
    let analysis = FraudDetector::analyze(cmd.amount, user, auction, db.bids(), now);
    let bid_id = Uuid::new_v4().to_string();

    let alert = match analysis.recommendation {
        Recommendation::BlockBid => {
            let alert = Alert::fraud_blocked(user, &cmd.auction_id, &analysis, now);
            warn!(
                "{:<12} --> 사기 의심 입찰 차단: user={}, score={}",
                "Command", cmd.user_id, analysis.total_score
            );
            db.append_alert(alert.clone());
            publisher.publish(&ServerMessage::Alert { alert });
            return Err(Error::FraudRejected(Box::new(analysis)));
        }
        Recommendation::ReviewBid | Recommendation::MonitorBid => Some(Alert::suspicious_bid(
            user,
            &cmd.auction_id,
            &bid_id,
            &analysis,
            now,
        )),
        Recommendation::AcceptBid => None,
    };

    // 의심 입찰은 알림 후 수락
    if let Some(alert) = alert {
        warn!(
            "{:<12} --> 의심 입찰 감지: user={}, score={}, risk={:?}",
            "Command", cmd.user_id, analysis.total_score, analysis.risk_level
        );
        db.append_alert(alert.clone());
        publisher.publish(&ServerMessage::Alert { alert });
    }

    let bid = Bid {
        id: bid_id,
        auction_id: cmd.auction_id.clone(),
        user_id: cmd.user_id.clone(),
        amount: cmd.amount,
        timestamp: now,
        fraud_score: analysis.total_score,
        risk_level: analysis.risk_level,
    };
    db.insert_bid(bid.clone());

    let auction = db
        .auction_mut(&cmd.auction_id)
        .ok_or_else(|| Error::AuctionNotFound(cmd.auction_id.clone()))?;
    auction.current_price = cmd.amount;
    auction.highest_bidder = Some(cmd.user_id.clone());
    auction.bids_count += 1;
    let summary = auction.summary();
    let message = format!("New bid on {}: ${}", auction.title, cmd.amount);

    if let Some(user) = db.user_mut(&cmd.user_id) {
        user.bid_count += 1;
    }

    publisher.publish(&ServerMessage::BidPlaced {
        auction: summary.clone(),
        message,
    });
    info!(
        "{:<12} --> 입찰 성공: auction={}, 현재 가격 {}",
        "Command", summary.id, summary.current_price
    );

    Ok(BidReceipt {
        success: true,
        bid,
        auction: summary,
        fraud_analysis: analysis,
    })
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::model::AlertType;
    use crate::database::seed;
    use crate::error::ErrorKind;
    use crate::fraud::RiskLevel;
    use crate::message_broker::RecordingPublisher;
    use chrono::Duration;

    fn setup() -> (Database, RecordingPublisher, String) {
        let db = seed::seeded(Utc::now());
        let auction_id = db
            .auctions()
            .find(|a| a.title == "Vintage Gaming Console")
            .map(|a| a.id.clone())
            .unwrap();
        (db, RecordingPublisher::default(), auction_id)
    }

    fn cmd(auction_id: &str, user_id: &str, amount: i64) -> PlaceBidCommand {
        PlaceBidCommand {
            auction_id: auction_id.to_string(),
            user_id: user_id.to_string(),
            amount,
        }
    }

    #[test]
    fn trusted_bid_is_accepted_without_alerts() {
        let (mut db, publisher, auction_id) = setup();

        let receipt = place_bid(&mut db, &publisher, cmd(&auction_id, "user1", 260), Utc::now())
            .unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.fraud_analysis.total_score, 0);
        assert_eq!(receipt.bid.fraud_score, 0);
        assert_eq!(receipt.auction.current_price, 260);
        assert_eq!(receipt.auction.highest_bidder.as_deref(), Some("user1"));
        assert_eq!(receipt.auction.bids_count, 1);

        assert_eq!(db.auction(&auction_id).unwrap().current_price, 260);
        assert_eq!(db.user("user1").unwrap().bid_count, 151);
        assert_eq!(db.bid_count(), 1);
        assert!(db.alerts().is_empty());

        let messages = publisher.messages();
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            &messages[0],
            ServerMessage::BidPlaced { message, .. }
                if message == "New bid on Vintage Gaming Console: $260"
        ));
    }

    #[test]
    fn blocked_bid_only_appends_a_critical_alert() {
        let (mut db, publisher, auction_id) = setup();

        let err = place_bid(&mut db, &publisher, cmd(&auction_id, "fraud_bot", 300), Utc::now())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FraudRejected);
        match &err {
            Error::FraudRejected(analysis) => assert_eq!(analysis.total_score, 100),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(db.auction(&auction_id).unwrap().current_price, 250);
        assert_eq!(db.auction(&auction_id).unwrap().bids_count, 0);
        assert_eq!(db.user("fraud_bot").unwrap().bid_count, 2000);
        assert_eq!(db.bid_count(), 0);

        assert_eq!(db.alerts().len(), 1);
        let alert = &db.alerts()[0];
        assert_eq!(alert.alert_type, AlertType::FraudBlocked);
        assert_eq!(alert.severity, RiskLevel::Critical);
        assert_eq!(alert.bid_id, None);
        assert_eq!(
            alert.message,
            "Bid from Suspicious Bot blocked due to fraud detection (Score: 100)"
        );

        let messages = publisher.messages();
        assert_eq!(messages.len(), 1);
        assert!(matches!(&messages[0], ServerMessage::Alert { .. }));
    }

    #[test]
    fn low_bid_is_rejected_before_fraud_evaluation() {
        let (mut db, publisher, auction_id) = setup();

        for amount in [250, 100] {
            let command = cmd(&auction_id, "fraud_bot", amount);
            let err = place_bid(&mut db, &publisher, command, Utc::now()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        assert!(db.alerts().is_empty());
        assert_eq!(db.bid_count(), 0);
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn unknown_auction_or_user_is_not_found() {
        let (mut db, publisher, auction_id) = setup();

        let err = place_bid(&mut db, &publisher, cmd("missing", "user1", 999), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::AuctionNotFound(_)));

        let err = place_bid(&mut db, &publisher, cmd(&auction_id, "ghost", 999), Utc::now())
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
        assert!(publisher.messages().is_empty());
    }

    #[test]
    fn suspicious_bid_alerts_then_is_accepted() {
        let (mut db, publisher, auction_id) = setup();
        let now = Utc::now();

        // 6건 연속 입찰 (자기 자신은 평가 시점에 포함되지 않음)
        for i in 1..=6 {
            let receipt = place_bid(&mut db, &publisher, cmd(&auction_id, "user1", 250 + i), now)
                .unwrap();
            assert_eq!(receipt.fraud_analysis.factors.bid_velocity, 0);
        }
        assert!(db.alerts().is_empty());

        // 이전 입찰 6건 -> 속도 18, 금액 이상 15 -> MEDIUM
        let current = db.auction(&auction_id).unwrap().current_price;
        let receipt = place_bid(
            &mut db,
            &publisher,
            cmd(&auction_id, "user1", current * 5 + 1),
            now + Duration::seconds(1),
        )
        .unwrap();

        assert_eq!(receipt.fraud_analysis.factors.bid_velocity, 18);
        assert_eq!(receipt.fraud_analysis.factors.bid_amount, 15);
        assert_eq!(receipt.fraud_analysis.total_score, 33);
        assert_eq!(receipt.bid.risk_level, RiskLevel::Medium);
        assert_eq!(receipt.fraud_analysis.recommendation, Recommendation::MonitorBid);

        assert_eq!(db.alerts().len(), 1);
        let alert = &db.alerts()[0];
        assert_eq!(alert.alert_type, AlertType::SuspiciousBid);
        assert_eq!(alert.severity, RiskLevel::Medium);
        assert_eq!(alert.bid_id.as_deref(), Some(receipt.bid.id.as_str()));
        assert_eq!(alert.message, "Suspicious bid from John Doe - Score: 33");
        assert_eq!(db.auction(&auction_id).unwrap().current_price, current * 5 + 1);
        assert_eq!(db.bid_count(), 7);

        // 알림이 BID_PLACED 보다 먼저 나간다
        let messages = publisher.messages();
        let tail: Vec<&ServerMessage> = messages.iter().rev().take(2).collect();
        assert!(matches!(tail[0], ServerMessage::BidPlaced { .. }));
        assert!(matches!(tail[1], ServerMessage::Alert { .. }));
    }

    #[tokio::test]
    async fn concurrent_bids_at_same_price_accept_exactly_one() {
        let (db, _, auction_id) = setup();
        let db_manager = std::sync::Arc::new(DatabaseManager::new(db));
        let publisher = std::sync::Arc::new(RecordingPublisher::default());

        let mut handles = vec![];
        for user_id in ["user1", "user2"] {
            let db_manager = db_manager.clone();
            let publisher = publisher.clone();
            let command = cmd(&auction_id, user_id, 300);
            handles.push(tokio::spawn(async move {
                handle_place_bid(command, &db_manager, publisher.as_ref()).await
            }));
        }

        let mut accepted = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(e) => {
                    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
                    rejected += 1;
                }
            }
        }

        assert_eq!((accepted, rejected), (1, 1));
        let auction_price = db_manager
            .read(|db| db.auction(&auction_id).map(|a| a.current_price))
            .await;
        assert_eq!(auction_price, Some(300));
    }
}
