use crate::domain::member::Member;
use crate::domain::value_objects::{Email, MemberId};
use crate::ports::member_repository::{
    InsertMemberError, MemberRepository as MemberRepositoryTrait, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをMemberに変換する
///
/// 保存済みメールアドレスの再パースに失敗した場合は
/// データ不正としてエラーを返す。
fn map_row_to_member(row: &PgRow) -> Result<Member> {
    let email_str: String = row.get("email");
    let email = Email::parse(&email_str).map_err(|_| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("invalid email in members table: {}", email_str),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Member {
        member_id: MemberId::from_uuid(row.get("member_id")),
        name: row.get("name"),
        email,
        password_hash: row.get("password_hash"),
        active: row.get("active"),
        created_at: row.get("created_at"),
    })
}

/// MemberRepositoryのPostgreSQL実装
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    /// 会員を登録する
    ///
    /// メールアドレスの一意制約違反はDuplicateEmailに変換する。
    async fn insert(&self, member: Member) -> std::result::Result<(), InsertMemberError> {
        sqlx::query(
            r#"
            INSERT INTO members (member_id, name, email, password_hash, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(member.member_id.value())
        .bind(&member.name)
        .bind(member.email.as_str())
        .bind(&member.password_hash)
        .bind(member.active)
        .bind(member.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                InsertMemberError::DuplicateEmail
            }
            _ => InsertMemberError::Backend(Box::new(e)),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, name, email, password_hash, active, created_at
            FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, name, email, password_hash, active, created_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            r#"
            SELECT member_id, name, email, password_hash, active, created_at
            FROM members
            ORDER BY created_at ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_member).collect()
    }
}
