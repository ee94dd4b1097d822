use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use crate::ports::loan_repository::{
    CompleteLoanError, InsertLoanError, LoanRepository as LoanRepositoryTrait, Result,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// LoanRepositoryのインメモリ実装
///
/// すべての書き込みを単一のMutexで直列化する。
/// 「1冊につき未返却の貸出は最大1件」と会員の貸出上限の検証を
/// 挿入と同じロック内で行い、同時リクエストを不変条件の範囲内に
/// 解決する。
pub struct LoanRepository {
    loans: Mutex<Vec<Loan>>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(Vec::new()),
        }
    }
}

impl Default for LoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn insert_open(
        &self,
        loan: Loan,
        max_open_per_member: usize,
    ) -> std::result::Result<(), InsertLoanError> {
        let mut loans = self.loans.lock().unwrap();

        // 一意制約：未返却の貸出は書籍ごとに1件まで
        if loans.iter().any(|l| l.book_id == loan.book_id && l.is_open()) {
            return Err(InsertLoanError::OpenLoanConflict);
        }

        // 会員の貸出上限も同じロック内で検証する
        let open_count = loans
            .iter()
            .filter(|l| l.member_id == loan.member_id && l.is_open())
            .count();
        if open_count >= max_open_per_member {
            return Err(InsertLoanError::MemberLimitExceeded);
        }

        loans.push(loan);
        Ok(())
    }

    async fn complete(&self, loan: &Loan) -> std::result::Result<(), CompleteLoanError> {
        let mut loans = self.loans.lock().unwrap();

        // late_feeは1度だけ確定する（未返却の行のみ更新）
        match loans
            .iter_mut()
            .find(|l| l.loan_id == loan.loan_id && l.is_open())
        {
            Some(stored) => {
                stored.returned_at = loan.returned_at;
                stored.late_fee = loan.late_fee;
                Ok(())
            }
            None => Err(CompleteLoanError::AlreadyReturned),
        }
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.loan_id == loan_id)
            .cloned())
    }

    async fn find_open_by_book(&self, book_id: BookId) -> Result<Option<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.book_id == book_id && l.is_open())
            .cloned())
    }

    async fn count_open_for_member(&self, member_id: MemberId) -> Result<usize> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.member_id == member_id && l.is_open())
            .count())
    }

    async fn list_open(&self, skip: i64, limit: i64) -> Result<Vec<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.is_open())
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_member(
        &self,
        member_id: MemberId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.member_id == member_id)
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn open_book_ids(&self, book_ids: &[BookId]) -> Result<HashSet<BookId>> {
        let wanted: HashSet<BookId> = book_ids.iter().copied().collect();
        Ok(self
            .loans
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.is_open() && wanted.contains(&l.book_id))
            .map(|l| l.book_id)
            .collect())
    }
}
