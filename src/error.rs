use crate::fraud::FraudAnalysis;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// 에러 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    FraudRejected,
}

/// 서비스 에러
///
/// 모두 호출자에게 그대로 전달되며 내부 재시도는 없다.
/// 검증이 끝나기 전에는 저장소를 변경하지 않으므로 어떤 에러도 상태를 오염시키지 않는다.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Auction not found")]
    AuctionNotFound(String),
    #[error("User not found")]
    UserNotFound(String),
    #[error("Bid must be higher than current price")]
    BidTooLow { amount: i64, current_price: i64 },
    #[error("Bid rejected due to fraud detection")]
    FraudRejected(Box<FraudAnalysis>),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AuctionNotFound(_) | Error::UserNotFound(_) => ErrorKind::NotFound,
            Error::BidTooLow { .. } => ErrorKind::InvalidArgument,
            Error::FraudRejected(_) => ErrorKind::FraudRejected,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::AuctionNotFound(_) => "AUCTION_NOT_FOUND",
            Error::UserNotFound(_) => "USER_NOT_FOUND",
            Error::BidTooLow { .. } => "LOW_BID",
            Error::FraudRejected(_) => "FRAUD_BLOCKED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::FraudRejected => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Error::BidTooLow {
                amount,
                current_price,
            } => json!({
                "error": self.to_string(),
                "code": self.code(),
                "amount": amount,
                "currentPrice": current_price,
            }),
            Error::FraudRejected(analysis) => json!({
                "error": self.to_string(),
                "code": self.code(),
                "fraudAnalysis": analysis,
            }),
            _ => json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
