use crate::domain::member::Member;
use crate::domain::value_objects::MemberId;
use crate::ports::member_repository::{
    InsertMemberError, MemberRepository as MemberRepositoryTrait, Result,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// MemberRepositoryのインメモリ実装
pub struct MemberRepository {
    members: Mutex<Vec<Member>>,
}

impl MemberRepository {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
        }
    }

    /// テスト用：会員を無効化する
    pub fn deactivate(&self, member_id: MemberId) {
        let mut members = self.members.lock().unwrap();
        if let Some(m) = members.iter_mut().find(|m| m.member_id == member_id) {
            m.active = false;
        }
    }
}

impl Default for MemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn insert(&self, member: Member) -> std::result::Result<(), InsertMemberError> {
        let mut members = self.members.lock().unwrap();

        // 一意制約：メールアドレス
        if members.iter().any(|m| m.email == member.email) {
            return Err(InsertMemberError::DuplicateEmail);
        }

        members.push(member);
        Ok(())
    }

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.member_id == member_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.email.as_str() == email)
            .cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Member>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
