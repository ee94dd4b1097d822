use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 貸出ID - 貸出の集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

/// 書籍ID - カタログへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// 会員ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

/// 著者ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorId(Uuid);

impl AuthorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for AuthorId {
    fn default() -> Self {
        Self::new()
    }
}

/// メールアドレスのバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// 形式が不正（空、または@を含まない）
    Invalid,
}

/// メールアドレス
///
/// 不変条件：空でなく、@を含む。
/// 会員の一意キー（重複はリポジトリの一意制約で検出する）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// 文字列からメールアドレスを生成する
    ///
    /// # エラー
    /// 形式が不正な場合は`EmailError::Invalid`を返す
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(EmailError::Invalid);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 貸出ステータス
///
/// 導出値であり、永続化しない。
/// 判定は`domain::loan::status_of`に一元化する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    /// 貸出中（期限内）
    Active,
    /// 延滞中（期限超過、未返却）
    Overdue,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    /// ワイヤ表現（大文字が正準。旧名DELAYEDは使用しない）
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Overdue => "OVERDUE",
            LoanStatus::Returned => "RETURNED",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(LoanStatus::Active),
            "OVERDUE" => Ok(LoanStatus::Overdue),
            "RETURNED" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_loan_id_creation() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_loan_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = LoanId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_book_id_creation() {
        let id1 = BookId::new();
        let id2 = BookId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_member_id_creation() {
        let id1 = MemberId::new();
        let id2 = MemberId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_author_id_creation() {
        let id1 = AuthorId::new();
        let id2 = AuthorId::new();
        assert_ne!(id1, id2);
    }

    // TDD: Email のテスト
    #[test]
    fn test_email_parse_valid() {
        let email = Email::parse("alice@example.com");
        assert!(email.is_ok());
        assert_eq!(email.unwrap().as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_parse_trims_whitespace() {
        let email = Email::parse("  alice@example.com  ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_parse_rejects_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Invalid));
        assert_eq!(Email::parse("   "), Err(EmailError::Invalid));
    }

    #[test]
    fn test_email_parse_rejects_missing_at() {
        assert_eq!(Email::parse("alice.example.com"), Err(EmailError::Invalid));
    }

    // TDD: LoanStatus のテスト
    #[test]
    fn test_loan_status_as_str() {
        assert_eq!(LoanStatus::Active.as_str(), "ACTIVE");
        assert_eq!(LoanStatus::Overdue.as_str(), "OVERDUE");
        assert_eq!(LoanStatus::Returned.as_str(), "RETURNED");
    }

    #[test]
    fn test_loan_status_from_str_roundtrip() {
        for status in [LoanStatus::Active, LoanStatus::Overdue, LoanStatus::Returned] {
            assert_eq!(LoanStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_loan_status_from_str_rejects_legacy_vocabulary() {
        // 旧名DELAYEDは受け付けない
        assert!(LoanStatus::from_str("DELAYED").is_err());
        assert!(LoanStatus::from_str("active").is_err());
    }
}
