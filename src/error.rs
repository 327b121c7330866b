/*
 * Responsibility
 * - アプリ共通の AppError 定義と IntoResponse (HTTP status / JSON error body)
 * - auth gate の拒否 (GateRejection) を {"reason": ...} 形式の応答に変換
 * - 内部エラーの詳細は body に出さない (ログのみ)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::gate::{GateRejection, MISSING_TOKEN_REASON, UNKNOWN_TOKEN_REASON};

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
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
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

/// Body of a client-facing gate rejection.
#[derive(Debug, Serialize)]
pub struct ReasonBody {
    pub reason: &'static str,
}

impl GateRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            GateRejection::MissingToken => StatusCode::BAD_REQUEST,
            GateRejection::UnknownToken => StatusCode::FORBIDDEN,
            GateRejection::ResolutionFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            GateRejection::MissingToken => Some(MISSING_TOKEN_REASON),
            GateRejection::UnknownToken => Some(UNKNOWN_TOKEN_REASON),
            GateRejection::ResolutionFailure => None,
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self.reason() {
            Some(reason) => (self.status(), Json(ReasonBody { reason })).into_response(),
            None => self.status().into_response(),
        }
    }
}
