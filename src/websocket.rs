/// 실시간 알림 채널
/// 클라이언트마다 하나의 태스크가 수신 프레임 처리와 브로드캐스트 전달을 함께 맡는다.
// region:    --- Imports
use crate::auction::events::{ClientMessage, ServerMessage};
use crate::message_broker::{Broadcaster, Subscription};
use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

// endregion: --- Imports

/// 웹소켓 업그레이드
pub async fn handle_ws(
    ws: WebSocketUpgrade,
    State((_, broadcaster)): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

async fn handle_socket(mut socket: WebSocket, broadcaster: Arc<Broadcaster>) {
    let Subscription { id, mut receiver } = broadcaster.subscribe();
    info!(
        "{:<12} --> 새 클라이언트 연결: id={} (활성 {}개)",
        "Socket",
        id,
        broadcaster.subscriber_count()
    );

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("{:<12} --> 잘못된 바이너리 프레임: {:?}", "Socket", e);
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("{:<12} --> 수신 오류: {:?}", "Socket", e);
                        break;
                    }
                };

                if let Some(reply) = handle_client_message(&broadcaster, id, &text) {
                    if socket.send(Message::Text(reply)).await.is_err() {
                        break;
                    }
                }
            }
            outgoing = receiver.recv() => {
                let Some(frame) = outgoing else {
                    break;
                };
                if socket.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
        }
    }

    let user_id = broadcaster.user_of(id);
    broadcaster.unsubscribe(id);
    info!(
        "{:<12} --> 클라이언트 연결 종료: id={} user={:?}",
        "Socket",
        id,
        user_id
    );
}

/// 클라이언트 프레임 처리. 응답이 필요하면 직렬화된 메시지를 돌려준다.
///
/// 잘못된 메시지는 로그만 남기고 버린다.
pub fn handle_client_message(broadcaster: &Broadcaster, id: u64, text: &str) -> Option<String> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("{:<12} --> 잘못된 메시지 무시: {}", "Socket", e);
            return None;
        }
    };

    match message {
        ClientMessage::Subscribe { user_id } => {
            broadcaster.identify(id, user_id.clone());
            let ack = ServerMessage::Subscribed {
                user_id,
                timestamp: Utc::now(),
            };
            match serde_json::to_string(&ack) {
                Ok(json) => Some(json),
                Err(e) => {
                    error!("{:<12} --> 응답 직렬화 실패: {:?}", "Socket", e);
                    None
                }
            }
        }
    }
}
