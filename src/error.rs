/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - provider / validation / session store のエラーを統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::augmenter::AugmentError;
use crate::services::session::SessionStoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("{code}: {message}")]
    BadGateway { code: &'static str, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn bad_gateway(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadGateway {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body too large".into(),
            ),
            AppError::BadGateway { code, message } => (StatusCode::BAD_GATEWAY, code, message),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AugmentError> for AppError {
    fn from(e: AugmentError) -> Self {
        // 詳細は augmenter 側でログ済み。利用者には返さない
        match e {
            AugmentError::Transport(_) => {
                AppError::bad_gateway("PROVIDER_UNAVAILABLE", "provider request failed")
            }
            AugmentError::Validation { .. } => {
                AppError::bad_gateway("PROVIDER_INVALID_RESPONSE", "provider returned invalid data")
            }
        }
    }
}

impl From<SessionStoreError> for AppError {
    fn from(e: SessionStoreError) -> Self {
        tracing::error!(error = ?e, "session store failure");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validators::Verdict;

    #[test]
    fn validation_failure_maps_to_bad_gateway() {
        let err: AppError = AugmentError::Validation {
            verdict: Verdict::invalid(vec!["/: expected object".into()]),
        }
        .into();

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }
}
