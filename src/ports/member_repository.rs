use crate::domain::member::Member;
use crate::domain::value_objects::MemberId;
use async_trait::async_trait;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員登録のエラー
#[derive(Debug, Error)]
pub enum InsertMemberError {
    /// メールアドレスが既に登録済み
    #[error("email already registered")]
    DuplicateEmail,
    /// ストレージ層の障害
    #[error("member repository backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 会員リポジトリポート
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 会員を登録する
    ///
    /// メールアドレスの一意制約違反は
    /// `InsertMemberError::DuplicateEmail`として返す。
    async fn insert(&self, member: Member) -> std::result::Result<(), InsertMemberError>;

    /// IDで会員を取得する
    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>>;

    /// メールアドレスで会員を取得する（ログインに使用）
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>>;

    /// 会員一覧を取得する（登録順、ページネーション付き）
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Member>>;
}
