use crate::application::ApplicationError;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをHTTPレスポンスにマッピングする。
/// すべてのドメインエラーは構造化された4xx（{code, detail}）になる。
#[derive(Debug)]
pub enum ApiError {
    Application(ApplicationError),
    /// Bearerトークンの欠落・不正・期限切れ
    Unauthorized,
    /// トークン発行などの内部障害（認証失敗とは区別して500にする）
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid access token".to_string(),
            ),

            ApiError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }

            ApiError::Application(err) => match err {
                // 404 Not Found - リクエストされたリソースが存在しない
                ApplicationError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }

                // 400 Bad Request - ビジネスルール違反
                ApplicationError::BookUnavailable => {
                    (StatusCode::BAD_REQUEST, "BOOK_UNAVAILABLE", err.to_string())
                }
                ApplicationError::LoanLimitExceeded => (
                    StatusCode::BAD_REQUEST,
                    "LOAN_LIMIT_EXCEEDED",
                    err.to_string(),
                ),
                ApplicationError::AlreadyReturned => {
                    (StatusCode::BAD_REQUEST, "ALREADY_RETURNED", err.to_string())
                }
                ApplicationError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }

                // 409 Conflict - 一意制約違反
                ApplicationError::DuplicateIsbn => {
                    (StatusCode::CONFLICT, "DUPLICATE_ISBN", err.to_string())
                }
                ApplicationError::DuplicateEmail => {
                    (StatusCode::CONFLICT, "DUPLICATE_EMAIL", err.to_string())
                }

                // 401 Unauthorized - 認証失敗
                ApplicationError::Unauthorized => {
                    return unauthorized_response("UNAUTHORIZED", err.to_string());
                }

                // 500 Internal Server Error - システム障害
                // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                ApplicationError::Repository(ref e) => {
                    tracing::error!("Repository error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An unexpected error occurred".to_string(),
                    )
                }
            },
        };

        if status == StatusCode::UNAUTHORIZED {
            return unauthorized_response(code, detail);
        }

        let body = Json(ErrorResponse::new(code, detail));
        (status, body).into_response()
    }
}

/// 401レスポンス（WWW-Authenticateヘッダ付き）
fn unauthorized_response(code: &str, detail: String) -> Response {
    let body = Json(ErrorResponse::new(code, detail));
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        body,
    )
        .into_response()
}
