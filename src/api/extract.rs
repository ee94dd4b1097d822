use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::domain::value_objects::MemberId;

use super::error::ApiError;
use super::handlers::AppState;

/// 認証済み会員のエクストラクタ
///
/// `Authorization: Bearer <token>`を検証し、会員IDを取り出す。
/// ヘッダの欠落・形式不正・署名不正・期限切れはすべて401。
#[derive(Debug, Clone, Copy)]
pub struct CurrentMember(pub MemberId);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let member_id = state
            .auth_keys
            .verify(token)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(CurrentMember(member_id))
    }
}
