use chrono::{DateTime, Utc};

use crate::auth::password;
use crate::domain::loan::Loan;
use crate::domain::member::{self, Member, MemberError};
use crate::domain::value_objects::{Email, MemberId};
use crate::ports::InsertMemberError;

use super::errors::{ApplicationError, Result};
use super::loan_service::ServiceDependencies;

fn repository_error(e: Box<dyn std::error::Error + Send + Sync>) -> ApplicationError {
    ApplicationError::Repository(e)
}

/// 会員を登録する
///
/// ビジネスルール：
/// - 氏名・パスワードが空でないこと
/// - メールアドレスが形式として妥当で、重複しないこと
///
/// パスワードはソルト付きハッシュとして保存する。
pub async fn create_member(
    deps: &ServiceDependencies,
    name: &str,
    email: &str,
    raw_password: &str,
    now: DateTime<Utc>,
) -> Result<Member> {
    let email = Email::parse(email)
        .map_err(|_| ApplicationError::Validation("invalid email address".to_string()))?;

    if raw_password.is_empty() {
        return Err(ApplicationError::Validation(
            "password must not be empty".to_string(),
        ));
    }

    // 1. メールアドレスの重複チェック
    let existing = deps
        .member_repository
        .find_by_email(email.as_str())
        .await
        .map_err(repository_error)?;

    if existing.is_some() {
        return Err(ApplicationError::DuplicateEmail);
    }

    // 2. ドメイン層で会員を生成
    let password_hash = password::hash(raw_password);
    let member = member::register_member(name, email, password_hash, now).map_err(|e| match e {
        MemberError::EmptyName => {
            ApplicationError::Validation("member name must not be empty".to_string())
        }
    })?;

    // 3. 永続化（競合時は一意制約が検出）
    deps.member_repository
        .insert(member.clone())
        .await
        .map_err(|e| match e {
            InsertMemberError::DuplicateEmail => ApplicationError::DuplicateEmail,
            InsertMemberError::Backend(e) => ApplicationError::Repository(e),
        })?;

    Ok(member)
}

/// 会員一覧を取得する
pub async fn list_members(
    deps: &ServiceDependencies,
    skip: i64,
    limit: i64,
) -> Result<Vec<Member>> {
    deps.member_repository
        .list(skip, limit)
        .await
        .map_err(repository_error)
}

/// IDで会員を取得する
pub async fn get_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.member_repository
        .find_by_id(member_id)
        .await
        .map_err(repository_error)?
        .ok_or(ApplicationError::NotFound("User"))
}

/// 会員の貸出履歴を取得する
pub async fn member_loans(
    deps: &ServiceDependencies,
    member_id: MemberId,
    skip: i64,
    limit: i64,
) -> Result<Vec<Loan>> {
    // 会員の存在確認（存在しない会員の履歴は404）
    get_member(deps, member_id).await?;

    deps.loan_repository
        .find_by_member(member_id, skip, limit)
        .await
        .map_err(repository_error)
}
