use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, MemberId};

/// 会員登録のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberError {
    /// 氏名が空
    EmptyName,
}

/// 会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: Email,
    /// ソルト付きハッシュ（auth::passwordで生成）
    pub password_hash: String,
    /// 無効化された会員は新規貸出不可
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// 純粋関数：会員を登録する
///
/// メールアドレスの重複検証はアプリケーション層と
/// リポジトリの一意制約の責務。
pub fn register_member(
    name: &str,
    email: Email,
    password_hash: String,
    now: DateTime<Utc>,
) -> Result<Member, MemberError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MemberError::EmptyName);
    }

    Ok(Member {
        member_id: MemberId::new(),
        name: name.to_string(),
        email,
        password_hash,
        active: true,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_member_success() {
        let email = Email::parse("alice@example.com").unwrap();
        let member = register_member("Alice", email, "hash".to_string(), Utc::now()).unwrap();

        assert_eq!(member.name, "Alice");
        assert!(member.active);
    }

    #[test]
    fn test_register_member_rejects_empty_name() {
        let email = Email::parse("alice@example.com").unwrap();
        let result = register_member("   ", email, "hash".to_string(), Utc::now());
        assert_eq!(result, Err(MemberError::EmptyName));
    }
}
