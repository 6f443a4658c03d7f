/// 초기 데이터
/// 사용자 3명, 경매 4건. 경매 id 는 기동할 때마다 새로 발급된다.
use super::Database;
use crate::auction::model::{Auction, AuctionStatus, User};
use crate::fraud::RiskLevel;
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

const SELLER: &str = "admin";

// (id, name, email, trust_score, bid_count, success_rate, risk_level)
const USERS: [(&str, &str, &str, u32, u64, u32, RiskLevel); 3] = [
    ("user1", "John Doe", "john@example.com", 95, 150, 98, RiskLevel::Low),
    ("user2", "Jane Smith", "jane@example.com", 87, 45, 92, RiskLevel::Low),
    ("fraud_bot", "Suspicious Bot", "bot@fake.com", 15, 2000, 5, RiskLevel::Critical),
];

// (title, description, category, starting_price, current_price, duration_minutes)
const AUCTIONS: [(&str, &str, &str, i64, i64, i64); 4] = [
    (
        "Vintage Gaming Console",
        "Rare original Nintendo console in excellent condition",
        "Electronics",
        100,
        250,
        60,
    ),
    (
        "Antique Watch",
        "Swiss-made pocket watch from 1920s",
        "Collectibles",
        200,
        500,
        120,
    ),
    (
        "Modern Laptop",
        "Latest model laptop, brand new",
        "Electronics",
        600,
        800,
        90,
    ),
    (
        "Art Print Collection",
        "Set of 5 limited edition prints",
        "Art",
        50,
        150,
        45,
    ),
];

/// 초기 데이터가 채워진 저장소 생성
pub fn seeded(now: DateTime<Utc>) -> Database {
    let mut db = Database::new();
    populate(&mut db, now);
    db
}

/// 초기 사용자와 경매 추가
pub fn populate(db: &mut Database, now: DateTime<Utc>) {
    for (id, name, email, trust_score, bid_count, success_rate, risk_level) in USERS {
        db.insert_user(User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            trust_score,
            bid_count,
            success_rate,
            risk_level,
        });
    }

    for (title, description, category, starting_price, current_price, minutes) in AUCTIONS {
        db.insert_auction(Auction {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            starting_price,
            current_price,
            end_time: now + Duration::minutes(minutes),
            seller: SELLER.to_string(),
            highest_bidder: None,
            status: AuctionStatus::Active,
            bids_count: 0,
        });
    }

    info!(
        "{:<12} --> 초기 데이터 생성: users={}, auctions={}",
        "Seed",
        USERS.len(),
        AUCTIONS.len()
    );
}
