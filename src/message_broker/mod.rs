// region:    --- Imports
use crate::auction::events::ServerMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, error, info, warn};

// endregion: --- Imports

// region:    --- Event Publisher
/// 입찰 파이프라인이 실시간 메시지를 내보내는 지점
///
/// 발행은 블로킹하지 않으며 실패해도 호출자에게 에러를 전파하지 않는다.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, message: &ServerMessage);
}

// endregion: --- Event Publisher

// region:    --- Broadcaster
/// 구독자별 대기 프레임 한도. 이를 넘기면 읽지 않는 클라이언트로 보고 제거한다.
pub const SUBSCRIBER_BUFFER: usize = 256;

struct Subscriber {
    id: u64,
    user_id: Option<String>,
    sender: Sender<String>,
}

/// 구독 핸들. receiver 를 드롭하거나 읽지 않고 쌓아두면 다음 브로드캐스트 때 정리된다.
pub struct Subscription {
    pub id: u64,
    pub receiver: Receiver<String>,
}

/// 연결된 모든 실시간 클라이언트에 메시지를 팬아웃한다.
#[derive(Default)]
pub struct Broadcaster {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    // 잠금 중 패닉이 나도 구독자 목록은 계속 사용한다
    fn subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 새 구독자 등록
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = channel(SUBSCRIBER_BUFFER);
        self.subscribers().push(Subscriber {
            id,
            user_id: None,
            sender,
        });
        info!("{:<12} --> 구독자 등록: id={}", "Broker", id);
        Subscription { id, receiver }
    }

    /// SUBSCRIBE 핸드셰이크로 받은 사용자 id 연결
    pub fn identify(&self, id: u64, user_id: String) {
        if let Some(subscriber) = self.subscribers().iter_mut().find(|s| s.id == id) {
            subscriber.user_id = Some(user_id);
        }
    }

    /// 구독자에 연결된 사용자 id
    pub fn user_of(&self, id: u64) -> Option<String> {
        self.subscribers()
            .iter()
            .find(|s| s.id == id)
            .and_then(|s| s.user_id.clone())
    }

    /// 구독 해제
    pub fn unsubscribe(&self, id: u64) {
        self.subscribers().retain(|s| s.id != id);
        info!("{:<12} --> 구독자 해제: id={}", "Broker", id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    /// 모든 구독자에게 전송. 전송 실패한 구독자는 제거한다.
    pub fn broadcast(&self, message: &ServerMessage) {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                error!("{:<12} --> 메시지 직렬화 실패: {:?}", "Broker", e);
                return;
            }
        };

        let mut subscribers = self.subscribers();
        let before = subscribers.len();
        subscribers.retain(|s| match s.sender.try_send(json.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("{:<12} --> 수신이 밀린 구독자 제거: id={}", "Broker", s.id);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        });
        let dropped = before - subscribers.len();
        if dropped > 0 {
            debug!("{:<12} --> 끊어진 구독자 {}명 정리", "Broker", dropped);
        }
    }
}

impl EventPublisher for Broadcaster {
    fn publish(&self, message: &ServerMessage) {
        self.broadcast(message);
    }
}

// endregion: --- Broadcaster

// region:    --- Test Support
/// 발행된 메시지를 기록하는 테스트용 publisher
#[cfg(test)]
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<ServerMessage>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn messages(&self) -> Vec<ServerMessage> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
impl EventPublisher for RecordingPublisher {
    fn publish(&self, message: &ServerMessage) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push(message.clone());
        }
    }
}

// endregion: --- Test Support
