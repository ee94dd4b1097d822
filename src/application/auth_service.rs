use crate::auth::password;
use crate::domain::member::Member;

use super::errors::{ApplicationError, Result};
use super::loan_service::ServiceDependencies;

/// メールアドレスとパスワードで会員を認証する
///
/// 未知のメールアドレスとパスワード不一致は区別せず、
/// いずれもUnauthorizedを返す。
pub async fn authenticate(
    deps: &ServiceDependencies,
    username: &str,
    raw_password: &str,
) -> Result<Member> {
    let member = deps
        .member_repository
        .find_by_email(username)
        .await
        .map_err(ApplicationError::Repository)?
        .ok_or(ApplicationError::Unauthorized)?;

    if !password::verify(raw_password, &member.password_hash) {
        return Err(ApplicationError::Unauthorized);
    }

    Ok(member)
}
