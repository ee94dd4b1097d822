use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{Author, Book};
use crate::domain::loan::{self, Loan};
use crate::domain::member::Member;

/// 一覧取得のクエリパラメータ
///
/// 負の値は0に丸める（バックエンドに渡る前に正規化し、
/// ストレージ実装による挙動差をなくす）。
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    10
}

impl Pagination {
    pub fn skip(&self) -> i64 {
        self.skip.max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.max(0)
    }
}

/// ログインフォーム（form-encoded）
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// 著者登録リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateAuthorRequest {
    pub name: String,
}

/// 著者レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.author_id.value(),
            name: author.name,
            created_at: author.created_at,
        }
    }
}

/// 書籍登録リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: Uuid,
}

/// 書籍レスポンス
///
/// availableは導出値（未返却の貸出が存在しない）。
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: Uuid,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl BookResponse {
    pub fn from_book(book: Book, available: bool) -> Self {
        Self {
            id: book.book_id.value(),
            title: book.title,
            isbn: book.isbn,
            author_id: book.author_id.value(),
            available,
            created_at: book.created_at,
        }
    }
}

/// 空き状況レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub book_id: Uuid,
    pub available: bool,
}

/// 会員登録リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 会員レスポンス（password_hashは含めない）
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Member> for UserResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.member_id.value(),
            name: member.name,
            email: member.email.as_str().to_string(),
            active: member.active,
            created_at: member.created_at,
        }
    }
}

/// 貸出作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub user_id: Uuid,
    pub book_id: Uuid,
}

/// 貸出レスポンス
///
/// statusは保存値ではなく、レスポンス生成時に
/// `status_of`で導出する（一覧と詳細で必ず一致する）。
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: String,
    pub late_fee: Option<f64>,
}

impl LoanResponse {
    pub fn from_loan(loan: &Loan, now: DateTime<Utc>) -> Self {
        Self {
            id: loan.loan_id.value(),
            user_id: loan.member_id.value(),
            book_id: loan.book_id.value(),
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            return_date: loan.returned_at,
            status: loan::status_of(loan, now).as_str().to_string(),
            late_fee: loan.late_fee,
        }
    }
}

/// エラーレスポンス
///
/// codeは機械照合用の安定した識別子。クライアントは
/// detailの文字列ではなくcodeで分岐する。
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let page: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_pagination_clamps_negative_values() {
        // 負の値はストレージ実装に渡る前に0へ丸める
        let page: Pagination = serde_json::from_str(r#"{"skip": -5, "limit": -1}"#).unwrap();
        assert_eq!(page.skip(), 0);
        assert_eq!(page.limit(), 0);
    }

    #[test]
    fn test_pagination_passes_valid_values_through() {
        let page: Pagination = serde_json::from_str(r#"{"skip": 20, "limit": 50}"#).unwrap();
        assert_eq!(page.skip(), 20);
        assert_eq!(page.limit(), 50);
    }
}
