use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, MemberId};
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出作成のエラー
///
/// 「1冊の書籍につき未返却の貸出は最大1件」と「会員1人につき
/// 未返却の貸出は上限まで」の不変条件は、どちらも挿入と同じ
/// 原子的な単位の中で強制する。アプリケーション層の事前チェックを
/// すり抜けた同時リクエストはここで解決される。
#[derive(Debug, Error)]
pub enum InsertLoanError {
    /// 対象の書籍に未返却の貸出が既に存在する
    #[error("book already has an open loan")]
    OpenLoanConflict,
    /// 会員の未返却の貸出が既に上限に達している
    #[error("member already has the maximum number of open loans")]
    MemberLimitExceeded,
    /// ストレージ層の障害
    #[error("loan repository backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 返却確定のエラー
#[derive(Debug, Error)]
pub enum CompleteLoanError {
    /// 未返却の行が存在しない（既に返却済み）
    #[error("loan is already returned")]
    AlreadyReturned,
    /// ストレージ層の障害
    #[error("loan repository backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 貸出リポジトリポート
///
/// ステータスは保存しない。returned_atの有無と現在時刻から
/// 導出する（domain::loan::status_of）。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// 新しい貸出（未返却）を作成する
    ///
    /// 挿入と同じ原子的な単位の中で次を検証する：
    /// - 同じ書籍に未返却の貸出がないこと（`OpenLoanConflict`）
    /// - 会員の未返却の貸出が`max_open_per_member`未満であること
    ///   （`MemberLimitExceeded`）
    async fn insert_open(
        &self,
        loan: Loan,
        max_open_per_member: usize,
    ) -> std::result::Result<(), InsertLoanError>;

    /// 返却を永続化する（returned_atとlate_feeの確定）
    ///
    /// 未返却の行のみを更新する。更新対象がなかった場合は
    /// `CompleteLoanError::AlreadyReturned`を返す。確定済みの
    /// late_feeが上書きされることはない。
    async fn complete(&self, loan: &Loan) -> std::result::Result<(), CompleteLoanError>;

    /// IDで貸出を取得する
    async fn find_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 書籍の未返却の貸出を取得する（空き状況の導出に使用）
    async fn find_open_by_book(&self, book_id: BookId) -> Result<Option<Loan>>;

    /// 会員の未返却の貸出数を取得する（貸出上限の確認に使用）
    async fn count_open_for_member(&self, member_id: MemberId) -> Result<usize>;

    /// 未返却の貸出一覧を取得する（貸出日順、ページネーション付き）
    async fn list_open(&self, skip: i64, limit: i64) -> Result<Vec<Loan>>;

    /// 会員の全貸出を取得する（貸出履歴の表示に使用）
    async fn find_by_member(&self, member_id: MemberId, skip: i64, limit: i64)
    -> Result<Vec<Loan>>;

    /// 指定した書籍のうち、未返却の貸出がある書籍IDの集合を返す
    ///
    /// 一覧表示でのN+1クエリ回避に使用される。
    async fn open_book_ids(&self, book_ids: &[BookId]) -> Result<HashSet<BookId>>;
}
