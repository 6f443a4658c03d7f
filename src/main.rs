// region:    --- Imports
use chrono::Utc;
use clap::Parser;
use fraud_auction_service::config::ServerConfig;
use fraud_auction_service::database::{seed, Database, DatabaseManager};
use fraud_auction_service::message_broker::Broadcaster;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .with_target(false)
        .init();

    let config = ServerConfig::parse();

    // 인메모리 저장소 생성
    let database = if config.no_seed {
        info!("{:<12} --> 빈 저장소로 시작", "Main");
        Database::new()
    } else {
        seed::seeded(Utc::now())
    };
    let db_manager = Arc::new(DatabaseManager::new(database));

    // 실시간 알림 브로드캐스터
    let broadcaster = Arc::new(Broadcaster::new());

    let routes_all = fraud_auction_service::app((db_manager, broadcaster));

    // 리스너 생성
    let listener = match TcpListener::bind(config.bind_address()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(
                "{:<12} --> 리스너 생성 실패 {}: {:?}",
                "Main",
                config.bind_address(),
                e
            );
            return Err(e.into());
        }
    };
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    info!("{:<12} --> 서버 종료", "Main");
    Ok(())
}

/// Ctrl+C 수신 시 종료
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{:<12} --> 종료 시그널 대기 실패: {:?}", "Main", e);
        std::future::pending::<()>().await;
    }
}
// endregion: --- Main
