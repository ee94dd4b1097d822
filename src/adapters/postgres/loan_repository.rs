use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use crate::ports::loan_repository::{
    CompleteLoanError, InsertLoanError, LoanRepository as LoanRepositoryTrait, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashSet;
use uuid::Uuid;

fn map_row_to_loan(row: &PgRow) -> Loan {
    Loan {
        loan_id: LoanId::from_uuid(row.get("loan_id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        loan_date: row.get("loan_date"),
        due_date: row.get("due_date"),
        returned_at: row.get("returned_at"),
        late_fee: row.get("late_fee"),
    }
}

/// LoanRepositoryのPostgreSQL実装
///
/// 「1冊につき未返却の貸出は最大1件」は部分一意インデックス
/// （loans(book_id) WHERE returned_at IS NULL）で強制する。
/// 同一書籍への同時貸出はちょうど1件だけ成功する。
/// 会員の貸出上限は挿入トランザクション内で会員行をロックして
/// 検証し、同一会員の同時貸出を直列化する。
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn insert_open(
        &self,
        loan: Loan,
        max_open_per_member: usize,
    ) -> std::result::Result<(), InsertLoanError> {
        let backend = |e: sqlx::Error| InsertLoanError::Backend(Box::new(e));

        let mut tx = self.pool.begin().await.map_err(backend)?;

        // 会員行をロックし、同一会員の同時貸出を直列化する
        sqlx::query("SELECT member_id FROM members WHERE member_id = $1 FOR UPDATE")
            .bind(loan.member_id.value())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS open_count
            FROM loans
            WHERE member_id = $1 AND returned_at IS NULL
            "#,
        )
        .bind(loan.member_id.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(backend)?;

        let open_count: i64 = row.get("open_count");
        if open_count as usize >= max_open_per_member {
            return Err(InsertLoanError::MemberLimitExceeded);
        }

        sqlx::query(
            r#"
            INSERT INTO loans (loan_id, book_id, member_id, loan_date, due_date, returned_at, late_fee)
            VALUES ($1, $2, $3, $4, $5, NULL, NULL)
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.book_id.value())
        .bind(loan.member_id.value())
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                InsertLoanError::OpenLoanConflict
            }
            _ => InsertLoanError::Backend(Box::new(e)),
        })?;

        tx.commit().await.map_err(backend)?;

        Ok(())
    }

    /// 返却を永続化する
    ///
    /// returned_at IS NULLの行のみ更新するため、
    /// 確定済みのlate_feeが上書きされることはない。
    /// 更新対象がなかった場合はAlreadyReturnedを返す。
    async fn complete(&self, loan: &Loan) -> std::result::Result<(), CompleteLoanError> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET returned_at = $2, late_fee = $3
            WHERE loan_id = $1 AND returned_at IS NULL
            "#,
        )
        .bind(loan.loan_id.value())
        .bind(loan.returned_at)
        .bind(loan.late_fee)
        .execute(&self.pool)
        .await
        .map_err(|e| CompleteLoanError::Backend(Box::new(e)))?;

        if result.rows_affected() == 0 {
            return Err(CompleteLoanError::AlreadyReturned);
        }

        Ok(())
    }

    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT loan_id, book_id, member_id, loan_date, due_date, returned_at, late_fee
            FROM loans
            WHERE loan_id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    async fn find_open_by_book(&self, book_id: BookId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT loan_id, book_id, member_id, loan_date, due_date, returned_at, late_fee
            FROM loans
            WHERE book_id = $1 AND returned_at IS NULL
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    async fn count_open_for_member(&self, member_id: MemberId) -> Result<usize> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS open_count
            FROM loans
            WHERE member_id = $1 AND returned_at IS NULL
            "#,
        )
        .bind(member_id.value())
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.get("open_count");
        Ok(count as usize)
    }

    async fn list_open(&self, skip: i64, limit: i64) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT loan_id, book_id, member_id, loan_date, due_date, returned_at, late_fee
            FROM loans
            WHERE returned_at IS NULL
            ORDER BY loan_date ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_loan).collect())
    }

    async fn find_by_member(
        &self,
        member_id: MemberId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT loan_id, book_id, member_id, loan_date, due_date, returned_at, late_fee
            FROM loans
            WHERE member_id = $1
            ORDER BY loan_date ASC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(member_id.value())
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_loan).collect())
    }

    async fn open_book_ids(&self, book_ids: &[BookId]) -> Result<HashSet<BookId>> {
        let ids: Vec<Uuid> = book_ids.iter().map(|id| id.value()).collect();

        let rows = sqlx::query(
            r#"
            SELECT book_id
            FROM loans
            WHERE returned_at IS NULL AND book_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| BookId::from_uuid(row.get("book_id")))
            .collect())
    }
}
