use crate::domain::{self, commands::*, loan::Loan, value_objects::*};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{ApplicationError, Result};

/// 会員1人あたりの最大貸出冊数（未返却の貸出）
pub const MAX_OPEN_LOANS: usize = 3;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub book_repository: Arc<dyn BookRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
    pub loan_repository: Arc<dyn LoanRepository>,
}

fn repository_error(e: Box<dyn std::error::Error + Send + Sync>) -> ApplicationError {
    ApplicationError::Repository(e)
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 会員が存在し、有効であること
/// - 会員の未返却の貸出が3冊未満であること
/// - 書籍が存在し、未返却の貸出がないこと
///
/// 空き状況と貸出上限の事前チェックはエラーの優先順位を
/// 決めるためのもので、最終的な強制はリポジトリの挿入と同じ
/// 原子的な単位で行う。同時リクエストが事前チェックをすり抜けても
/// 不変条件は破れない。
pub async fn borrow_book(deps: &ServiceDependencies, cmd: BorrowBook) -> Result<Loan> {
    // 1. 会員の存在・有効性確認
    let member = deps
        .member_repository
        .find_by_id(cmd.member_id)
        .await
        .map_err(repository_error)?;

    match member {
        Some(m) if m.active => {}
        _ => return Err(ApplicationError::NotFound("User")),
    }

    // 2. 貸出上限確認（3冊まで）
    let open_count = deps
        .loan_repository
        .count_open_for_member(cmd.member_id)
        .await
        .map_err(repository_error)?;

    if open_count >= MAX_OPEN_LOANS {
        return Err(ApplicationError::LoanLimitExceeded);
    }

    // 3. 書籍の存在確認
    let book = deps
        .book_repository
        .find_by_id(cmd.book_id)
        .await
        .map_err(repository_error)?;

    if book.is_none() {
        return Err(ApplicationError::NotFound("Book"));
    }

    // 4. 空き状況確認（未返却の貸出がないこと）
    let open_loan = deps
        .loan_repository
        .find_open_by_book(cmd.book_id)
        .await
        .map_err(repository_error)?;

    if open_loan.is_some() {
        return Err(ApplicationError::BookUnavailable);
    }

    // 5. ドメイン層の純粋関数で貸出を生成
    let loan = domain::loan::check_out(cmd.book_id, cmd.member_id, cmd.borrowed_at);

    // 6. 永続化（書籍の競合・会員の上限超過はここで最終的に検出）
    deps.loan_repository
        .insert_open(loan.clone(), MAX_OPEN_LOANS)
        .await
        .map_err(|e| match e {
            InsertLoanError::OpenLoanConflict => ApplicationError::BookUnavailable,
            InsertLoanError::MemberLimitExceeded => ApplicationError::LoanLimitExceeded,
            InsertLoanError::Backend(e) => ApplicationError::Repository(e),
        })?;

    Ok(loan)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 既に返却済みでないこと（再返却は拒否）
/// - 延滞料金は返却時に確定し、以後不変
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<Loan> {
    // 1. 貸出の取得
    let loan = deps
        .loan_repository
        .find_by_id(cmd.loan_id)
        .await
        .map_err(repository_error)?
        .ok_or(ApplicationError::NotFound("Loan"))?;

    // 2. ドメイン層の純粋関数で返却を計算
    let returned = domain::loan::return_loan(&loan, cmd.returned_at)
        .map_err(|e| match e {
            domain::ReturnLoanError::AlreadyReturned => ApplicationError::AlreadyReturned,
        })?;

    // 3. 返却を永続化（書籍はこれで再び貸出可能になる）
    //    取得と確定の間に別のリクエストが返却を終えていた場合も
    //    ここでAlreadyReturnedになる
    deps.loan_repository
        .complete(&returned)
        .await
        .map_err(|e| match e {
            CompleteLoanError::AlreadyReturned => ApplicationError::AlreadyReturned,
            CompleteLoanError::Backend(e) => ApplicationError::Repository(e),
        })?;

    Ok(returned)
}

/// 未返却の貸出一覧を取得する（ACTIVEまたはOVERDUE）
///
/// ステータスはAPI層で`status_of`により表示時に導出される。
pub async fn list_open_loans(
    deps: &ServiceDependencies,
    skip: i64,
    limit: i64,
) -> Result<Vec<Loan>> {
    deps.loan_repository
        .list_open(skip, limit)
        .await
        .map_err(repository_error)
}

/// IDで貸出を取得する
pub async fn get_loan(deps: &ServiceDependencies, loan_id: LoanId) -> Result<Loan> {
    deps.loan_repository
        .find_by_id(loan_id)
        .await
        .map_err(repository_error)?
        .ok_or(ApplicationError::NotFound("Loan"))
}

/// 会員の未返却の貸出数を取得する
pub async fn open_loan_count_for(deps: &ServiceDependencies, member_id: MemberId) -> Result<usize> {
    deps.loan_repository
        .count_open_for_member(member_id)
        .await
        .map_err(repository_error)
}
