/// 인메모리 저장소
/// 프로세스 수명 동안만 유지되며 재시작 시 seed 로 다시 채운다.
// region:    --- Imports
use crate::auction::model::{Auction, User};
use crate::bidding::model::{Alert, Bid};
use indexmap::IndexMap;
use tokio::sync::{Mutex, MutexGuard};

// endregion: --- Imports

// region:    --- Modules
pub mod seed;

// endregion: --- Modules

// region:    --- Database
/// 경매, 사용자, 입찰, 알림 저장소
///
/// 삽입 순서를 유지한다. 알림 로그는 추가만 가능하다.
#[derive(Debug, Default)]
pub struct Database {
    auctions: IndexMap<String, Auction>,
    users: IndexMap<String, User>,
    bids: IndexMap<String, Bid>,
    alerts: Vec<Alert>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auction(&self, id: &str) -> Option<&Auction> {
        self.auctions.get(id)
    }

    pub fn auction_mut(&mut self, id: &str) -> Option<&mut Auction> {
        self.auctions.get_mut(id)
    }

    pub fn auctions(&self) -> impl Iterator<Item = &Auction> {
        self.auctions.values()
    }

    pub fn insert_auction(&mut self, auction: Auction) {
        self.auctions.insert(auction.id.clone(), auction);
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn bid(&self, id: &str) -> Option<&Bid> {
        self.bids.get(id)
    }

    pub fn bids(&self) -> impl Iterator<Item = &Bid> {
        self.bids.values()
    }

    /// 특정 사용자의 입찰 (삽입 순)
    pub fn bids_by_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Bid> + 'a {
        self.bids.values().filter(move |b| b.user_id == user_id)
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    pub fn insert_bid(&mut self, bid: Bid) {
        self.bids.insert(bid.id.clone(), bid);
    }

    /// 알림 로그 (오래된 순)
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn append_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }
}
// endregion: --- Database

// region:    --- Database Manager
/// 저장소 접근을 하나의 뮤텍스로 직렬화한다.
///
/// 입찰 파이프라인은 가격 검증부터 저장까지 잠금을 유지하므로
/// 두 입찰이 같은 current_price 를 보고 동시에 통과할 수 없다.
pub struct DatabaseManager {
    state: Mutex<Database>,
}

impl DatabaseManager {
    /// 데이터베이스 매니저 생성
    pub fn new(database: Database) -> Self {
        Self {
            state: Mutex::new(database),
        }
    }

    /// 잠금 획득 (FIFO)
    pub async fn lock(&self) -> MutexGuard<'_, Database> {
        self.state.lock().await
    }

    /// 읽기 전용 조회
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Database) -> R,
    {
        let db = self.state.lock().await;
        f(&db)
    }
}
// endregion: --- Database Manager
