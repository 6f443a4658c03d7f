/// 입찰 사기 탐지
/// 6개의 독립적인 가산 요소를 합산한 뒤 100 으로 제한한다.
/// 1. 신뢰도
/// 2. 입찰 속도
/// 3. 입찰 금액 이상치
/// 4. 사용자 행동
/// 5. 경매 패턴
/// 6. 기기 이상
// region:    --- Imports
use crate::auction::model::{Auction, User};
use crate::bidding::model::Bid;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// endregion: --- Imports

// region:    --- Constants
const MAX_SCORE: u32 = 100;

const TRUST_FLOOR: u32 = 50;
const TRUST_WEIGHT: u32 = 2;

const VELOCITY_WINDOW_SECS: i64 = 60;
const VELOCITY_THRESHOLD: usize = 5;
const VELOCITY_WEIGHT: u32 = 3;
const VELOCITY_CAP: u32 = 25;

const AMOUNT_MULTIPLIER: i64 = 5;
const AMOUNT_ANOMALY_SCORE: u32 = 15;

const LOW_SUCCESS_RATE: u32 = 30;
const USER_BEHAVIOR_SCORE: u32 = 20;

const AUCTION_PATTERN_THRESHOLD: usize = 10;
const AUCTION_PATTERN_SCORE: u32 = 15;

const DEVICE_BID_COUNT: u64 = 500;
const DEVICE_TRUST_CEILING: u32 = 30;
const DEVICE_ANOMALY_SCORE: u32 = 20;
// endregion: --- Constants

// region:    --- Risk Model
/// 사기 점수 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// 점수 -> 위험 등급 (높은 구간부터 평가)
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 75 => RiskLevel::Critical,
            s if s >= 50 => RiskLevel::High,
            s if s >= 25 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn recommendation(self) -> Recommendation {
        match self {
            RiskLevel::Critical => Recommendation::BlockBid,
            RiskLevel::High => Recommendation::ReviewBid,
            RiskLevel::Medium => Recommendation::MonitorBid,
            RiskLevel::Low => Recommendation::AcceptBid,
        }
    }
}

/// 입찰 처리 권고
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    AcceptBid,
    MonitorBid,
    ReviewBid,
    BlockBid,
}

/// 요소별 점수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudFactors {
    pub trust_score: u32,
    pub bid_velocity: u32,
    pub bid_amount: u32,
    pub user_behavior: u32,
    pub auction_pattern: u32,
    pub device_anomaly: u32,
}

impl FraudFactors {
    /// 제한 전 합계
    pub fn raw_total(&self) -> u32 {
        self.trust_score
            + self.bid_velocity
            + self.bid_amount
            + self.user_behavior
            + self.auction_pattern
            + self.device_anomaly
    }
}

/// 사기 분석 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudAnalysis {
    pub total_score: u32,
    pub factors: FraudFactors,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
}

impl FraudAnalysis {
    fn from_factors(factors: FraudFactors) -> Self {
        let total_score = factors.raw_total().min(MAX_SCORE);
        let risk_level = RiskLevel::from_score(total_score);
        Self {
            total_score,
            factors,
            risk_level,
            recommendation: risk_level.recommendation(),
        }
    }
}
// endregion: --- Risk Model

// region:    --- Fraud Detector
pub struct FraudDetector;

impl FraudDetector {
    /// 입찰 후보를 평가한다.
    ///
    /// `history` 는 지금까지 저장된 전체 입찰 내역이며, 평가 중인 입찰은 아직 포함되지 않는다.
    /// 부수 효과 없음.
    pub fn analyze<'a, I>(
        amount: i64,
        user: &User,
        auction: &Auction,
        history: I,
        now: DateTime<Utc>,
    ) -> FraudAnalysis
    where
        I: IntoIterator<Item = &'a Bid>,
    {
        let window = Duration::seconds(VELOCITY_WINDOW_SECS);
        let mut recent_bids = 0usize;
        let mut bids_on_auction = 0usize;
        for bid in history.into_iter().filter(|b| b.user_id == user.id) {
            if now - bid.timestamp < window {
                recent_bids += 1;
            }
            if bid.auction_id == auction.id {
                bids_on_auction += 1;
            }
        }

        let factors = FraudFactors {
            trust_score: trust_factor(user),
            bid_velocity: velocity_factor(recent_bids),
            bid_amount: amount_factor(amount, auction),
            user_behavior: behavior_factor(user),
            auction_pattern: auction_pattern_factor(bids_on_auction),
            device_anomaly: device_factor(user),
        };
        let analysis = FraudAnalysis::from_factors(factors);

        debug!(
            "{:<12} --> 사기 점수 계산: user={}, auction={}, score={}, factors={:?}",
            "Fraud", user.id, auction.id, analysis.total_score, analysis.factors
        );
        analysis
    }
}

// 신뢰도가 낮을수록 위험
fn trust_factor(user: &User) -> u32 {
    if user.trust_score < TRUST_FLOOR {
        (TRUST_FLOOR - user.trust_score) * TRUST_WEIGHT
    } else {
        0
    }
}

// 최근 60초 내 입찰 수 (평가 중인 입찰 제외)
fn velocity_factor(recent_bids: usize) -> u32 {
    if recent_bids > VELOCITY_THRESHOLD {
        let weighted = u32::try_from(recent_bids)
            .unwrap_or(u32::MAX)
            .saturating_mul(VELOCITY_WEIGHT);
        weighted.min(VELOCITY_CAP)
    } else {
        0
    }
}

fn amount_factor(amount: i64, auction: &Auction) -> u32 {
    if amount > auction.current_price.saturating_mul(AMOUNT_MULTIPLIER) {
        AMOUNT_ANOMALY_SCORE
    } else {
        0
    }
}

fn behavior_factor(user: &User) -> u32 {
    if user.success_rate < LOW_SUCCESS_RATE {
        USER_BEHAVIOR_SCORE
    } else {
        0
    }
}

// 동일 경매에 대한 과도한 반복 입찰
fn auction_pattern_factor(bids_on_auction: usize) -> u32 {
    if bids_on_auction > AUCTION_PATTERN_THRESHOLD {
        AUCTION_PATTERN_SCORE
    } else {
        0
    }
}

// 실제 기기/IP 정보가 아닌 정적 휴리스틱
fn device_factor(user: &User) -> u32 {
    if user.bid_count > DEVICE_BID_COUNT && user.trust_score < DEVICE_TRUST_CEILING {
        DEVICE_ANOMALY_SCORE
    } else {
        0
    }
}
// endregion: --- Fraud Detector

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::AuctionStatus;

    const NO_BIDS: &[Bid] = &[];

    fn user(trust_score: u32, bid_count: u64, success_rate: u32) -> User {
        User {
            id: "u1".to_string(),
            name: "Tester".to_string(),
            email: "tester@example.com".to_string(),
            trust_score,
            bid_count,
            success_rate,
            risk_level: RiskLevel::Low,
        }
    }

    fn auction(id: &str, current_price: i64) -> Auction {
        Auction {
            id: id.to_string(),
            title: "Antique Watch".to_string(),
            description: "test".to_string(),
            category: "Collectibles".to_string(),
            starting_price: 100,
            current_price,
            end_time: Utc::now() + Duration::hours(1),
            seller: "admin".to_string(),
            highest_bidder: None,
            status: AuctionStatus::Active,
            bids_count: 0,
        }
    }

    fn bid(user_id: &str, auction_id: &str, timestamp: DateTime<Utc>) -> Bid {
        Bid {
            id: uuid::Uuid::new_v4().to_string(),
            auction_id: auction_id.to_string(),
            user_id: user_id.to_string(),
            amount: 1,
            timestamp,
            fraud_score: 0,
            risk_level: RiskLevel::Low,
        }
    }

    #[test]
    fn clean_user_scores_zero_and_is_accepted() {
        let now = Utc::now();
        let history: Vec<Bid> = (0..5).map(|_| bid("u1", "a1", now)).collect();

        let analysis = FraudDetector::analyze(
            1250,
            &user(50, 500, 30),
            &auction("a1", 250),
            &history,
            now,
        );

        assert_eq!(analysis.total_score, 0);
        assert_eq!(analysis.factors, FraudFactors::default());
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.recommendation, Recommendation::AcceptBid);
    }

    #[test]
    fn fraud_bot_is_clamped_to_100_and_blocked() {
        let now = Utc::now();
        let bot = user(15, 2000, 5);

        let analysis = FraudDetector::analyze(1251, &bot, &auction("a1", 250), NO_BIDS, now);

        assert_eq!(analysis.factors.trust_score, 70);
        assert_eq!(analysis.factors.bid_amount, 15);
        assert_eq!(analysis.factors.user_behavior, 20);
        assert_eq!(analysis.factors.device_anomaly, 20);
        assert_eq!(analysis.factors.raw_total(), 125);
        assert_eq!(analysis.total_score, 100);
        assert_eq!(analysis.risk_level, RiskLevel::Critical);
        assert_eq!(analysis.recommendation, Recommendation::BlockBid);
    }

    #[test]
    fn amount_exactly_five_times_is_not_anomalous() {
        let now = Utc::now();

        let analysis = FraudDetector::analyze(
            1250,
            &user(15, 2000, 5),
            &auction("a1", 250),
            NO_BIDS,
            now,
        );

        assert_eq!(analysis.factors.bid_amount, 0);
        assert_eq!(analysis.total_score, 100);
        assert_eq!(analysis.recommendation, Recommendation::BlockBid);
    }

    #[test]
    fn velocity_counts_only_prior_bids_within_window() {
        let now = Utc::now();
        let target = auction("a1", 250);
        let trusted = user(95, 150, 98);

        // 이전 입찰 5건: 임계값(>5) 미만
        let mut history: Vec<Bid> = (0..5)
            .map(|i| bid("u1", &format!("other-{i}"), now - Duration::seconds(10)))
            .collect();
        let analysis = FraudDetector::analyze(260, &trusted, &target, &history, now);
        assert_eq!(analysis.factors.bid_velocity, 0);

        // 6번째 이전 입찰부터 반영
        history.push(bid("u1", "other-5", now - Duration::seconds(59)));
        let analysis = FraudDetector::analyze(260, &trusted, &target, &history, now);
        assert_eq!(analysis.factors.bid_velocity, 18);

        // 윈도우 밖 입찰, 다른 사용자 입찰은 제외
        history.push(bid("u1", "old", now - Duration::seconds(60)));
        history.push(bid("someone-else", "a1", now));
        let analysis = FraudDetector::analyze(260, &trusted, &target, &history, now);
        assert_eq!(analysis.factors.bid_velocity, 18);
    }

    #[test]
    fn velocity_is_capped_at_25() {
        let now = Utc::now();
        let history: Vec<Bid> = (0..20).map(|i| bid("u1", &format!("x{i}"), now)).collect();

        let analysis =
            FraudDetector::analyze(260, &user(95, 150, 98), &auction("a1", 250), &history, now);

        assert_eq!(analysis.factors.bid_velocity, 25);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.recommendation, Recommendation::MonitorBid);
    }

    #[test]
    fn auction_pattern_needs_more_than_ten_prior_bids() {
        let old = Utc::now() - Duration::hours(2);
        let now = Utc::now();
        let mut history: Vec<Bid> = (0..10).map(|_| bid("u1", "a1", old)).collect();

        let trusted = user(95, 150, 98);
        let target = auction("a1", 250);
        assert_eq!(
            FraudDetector::analyze(260, &trusted, &target, &history, now)
                .factors
                .auction_pattern,
            0
        );

        history.push(bid("u1", "a1", old));
        let analysis = FraudDetector::analyze(260, &trusted, &target, &history, now);
        assert_eq!(analysis.factors.auction_pattern, 15);
        assert_eq!(analysis.factors.bid_velocity, 0);
    }

    #[test]
    fn device_anomaly_requires_both_conditions() {
        let now = Utc::now();
        let target = auction("a1", 250);

        let many_bids_trusted =
            FraudDetector::analyze(260, &user(30, 501, 98), &target, NO_BIDS, now);
        assert_eq!(many_bids_trusted.factors.device_anomaly, 0);

        let few_bids_untrusted =
            FraudDetector::analyze(260, &user(29, 500, 98), &target, NO_BIDS, now);
        assert_eq!(few_bids_untrusted.factors.device_anomaly, 0);

        let both = FraudDetector::analyze(260, &user(29, 501, 98), &target, NO_BIDS, now);
        assert_eq!(both.factors.device_anomaly, 20);
        assert_eq!(both.factors.trust_score, 42);
        assert_eq!(both.total_score, 62);
        assert_eq!(both.recommendation, Recommendation::ReviewBid);
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(24), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(74), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);

        assert_eq!(RiskLevel::Low.recommendation(), Recommendation::AcceptBid);
        assert_eq!(RiskLevel::Medium.recommendation(), Recommendation::MonitorBid);
        assert_eq!(RiskLevel::High.recommendation(), Recommendation::ReviewBid);
        assert_eq!(RiskLevel::Critical.recommendation(), Recommendation::BlockBid);
    }

    #[test]
    fn analysis_serializes_with_original_factor_keys() {
        let analysis = FraudDetector::analyze(
            1251,
            &user(15, 2000, 5),
            &auction("a1", 250),
            NO_BIDS,
            Utc::now(),
        );
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["totalScore"], 100);
        assert_eq!(json["riskLevel"], "CRITICAL");
        assert_eq!(json["recommendation"], "BLOCK_BID");
        assert_eq!(json["factors"]["trustScore"], 70);
        assert_eq!(json["factors"]["bidVelocity"], 0);
        assert_eq!(json["factors"]["deviceAnomaly"], 20);
    }
}
