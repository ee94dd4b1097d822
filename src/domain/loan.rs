use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, LoanStatus, MemberId, ReturnLoanError};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// 延滞料金（1日あたり、通貨単位）
pub const LATE_FEE_PER_DAY: f64 = 2.0;

/// Loan集約 - 1冊の書籍の1回の貸出
///
/// ステータスは保持しない。返却情報と現在時刻から
/// `status_of`で都度導出する（表示箇所間の不整合を防ぐ）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    // 識別子
    pub loan_id: LoanId,

    // 他の集約への参照（IDのみ）
    pub book_id: BookId,
    pub member_id: MemberId,

    // 貸出管理の責務
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,

    // 返却時に1度だけ確定し、以後不変
    pub late_fee: Option<f64>,
}

impl Loan {
    /// 未返却か（ACTIVEまたはOVERDUE）
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出期間は14日間（due_date = loan_date + 14日）
/// - 返却日・延滞料金は未設定
///
/// 副作用なし。書籍の空き状況や会員の貸出上限の検証は
/// アプリケーション層の責務。
pub fn check_out(book_id: BookId, member_id: MemberId, now: DateTime<Utc>) -> Loan {
    Loan {
        loan_id: LoanId::new(),
        book_id,
        member_id,
        loan_date: now,
        due_date: now + Duration::days(LOAN_PERIOD_DAYS),
        returned_at: None,
        late_fee: None,
    }
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 延滞していても返却は受け付ける
/// - 延滞料金 = 延滞日数 × 2.00（返却時に確定、以後不変）
/// - 再返却は拒否する（冪等ではない）
///
/// 副作用なし。新しいLoanを返す。
pub fn return_loan(loan: &Loan, now: DateTime<Utc>) -> Result<Loan, ReturnLoanError> {
    if loan.returned_at.is_some() {
        return Err(ReturnLoanError::AlreadyReturned);
    }

    let days = overdue_days(loan.due_date, now);

    Ok(Loan {
        returned_at: Some(now),
        late_fee: Some(late_fee_for(days)),
        ..loan.clone()
    })
}

/// 純粋関数：ステータス判定
///
/// - RETURNED：returned_atが設定済み
/// - OVERDUE：未返却かつ now > due_date（厳密な大なり）
/// - ACTIVE：未返却かつ now <= due_date
///
/// (due_date, returned_at, now)のみに依存する。
pub fn status_of(loan: &Loan, now: DateTime<Utc>) -> LoanStatus {
    if loan.returned_at.is_some() {
        LoanStatus::Returned
    } else if now > loan.due_date {
        LoanStatus::Overdue
    } else {
        LoanStatus::Active
    }
}

/// 純粋関数：延滞日数
///
/// 丸1日単位で切り捨て。負にはならない。
/// 期限当日ちょうどの返却は0日。
pub fn overdue_days(due_date: DateTime<Utc>, at: DateTime<Utc>) -> i64 {
    (at - due_date).num_days().max(0)
}

/// 純粋関数：延滞料金
pub fn late_fee_for(overdue_days: i64) -> f64 {
    overdue_days as f64 * LATE_FEE_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_loan(loaned_at: DateTime<Utc>) -> Loan {
        check_out(BookId::new(), MemberId::new(), loaned_at)
    }

    // TDD: check_out() のテスト
    #[test]
    fn test_check_out_creates_loan_with_correct_due_date() {
        let book_id = BookId::new();
        let member_id = MemberId::new();
        let now = Utc::now();

        let loan = check_out(book_id, member_id, now);

        // 貸出期間は14日間
        assert_eq!(loan.due_date, now + Duration::days(14));
        assert_eq!(loan.loan_date, now);
        assert_eq!(loan.book_id, book_id);
        assert_eq!(loan.member_id, member_id);
        assert_eq!(loan.returned_at, None);
        assert_eq!(loan.late_fee, None);
        assert!(loan.is_open());
    }

    // TDD: status_of() のテスト
    #[test]
    fn test_status_of_active_before_due_date() {
        let now = Utc::now();
        let loan = open_loan(now);

        assert_eq!(status_of(&loan, now + Duration::days(7)), LoanStatus::Active);
    }

    #[test]
    fn test_status_of_active_exactly_at_due_date() {
        // 境界値：期限当日ちょうどはACTIVE（厳密な大なり比較）
        let now = Utc::now();
        let loan = open_loan(now);

        assert_eq!(status_of(&loan, loan.due_date), LoanStatus::Active);
    }

    #[test]
    fn test_status_of_overdue_after_due_date() {
        let now = Utc::now();
        let loan = open_loan(now);

        assert_eq!(
            status_of(&loan, loan.due_date + Duration::seconds(1)),
            LoanStatus::Overdue
        );
        assert_eq!(status_of(&loan, now + Duration::days(15)), LoanStatus::Overdue);
    }

    #[test]
    fn test_status_of_returned_regardless_of_time() {
        let now = Utc::now();
        let loan = open_loan(now);
        let returned = return_loan(&loan, now + Duration::days(7)).unwrap();

        // 返却済みならいつ見てもRETURNED
        assert_eq!(status_of(&returned, now), LoanStatus::Returned);
        assert_eq!(
            status_of(&returned, now + Duration::days(100)),
            LoanStatus::Returned
        );
    }

    // TDD: overdue_days() のテスト
    #[test]
    fn test_overdue_days_zero_at_due_date() {
        let due = Utc::now();
        assert_eq!(overdue_days(due, due), 0);
    }

    #[test]
    fn test_overdue_days_never_negative() {
        let due = Utc::now();
        assert_eq!(overdue_days(due, due - Duration::days(3)), 0);
    }

    #[test]
    fn test_overdue_days_truncates_partial_days() {
        let due = Utc::now();
        // 36時間超過 → 1日
        assert_eq!(overdue_days(due, due + Duration::hours(36)), 1);
        // 23時間超過 → 0日
        assert_eq!(overdue_days(due, due + Duration::hours(23)), 0);
    }

    // TDD: return_loan() のテスト
    #[test]
    fn test_return_loan_on_time_has_zero_fee() {
        let now = Utc::now();
        let loan = open_loan(now);

        let returned = return_loan(&loan, now + Duration::days(7)).unwrap();

        assert_eq!(returned.late_fee, Some(0.0));
        assert_eq!(returned.returned_at, Some(now + Duration::days(7)));
        assert!(!returned.is_open());
    }

    #[test]
    fn test_return_loan_exactly_at_due_date_has_zero_fee() {
        let now = Utc::now();
        let loan = open_loan(now);

        let returned = return_loan(&loan, loan.due_date).unwrap();

        assert_eq!(returned.late_fee, Some(0.0));
    }

    #[test]
    fn test_return_loan_one_day_late_charges_one_day() {
        let now = Utc::now();
        let loan = open_loan(now);

        let returned = return_loan(&loan, loan.due_date + Duration::days(1)).unwrap();

        assert_eq!(returned.late_fee, Some(2.0));
    }

    #[test]
    fn test_return_loan_two_days_late_charges_two_days() {
        // シナリオ：Day0貸出 → Day16返却（期限はDay14）
        let day0 = Utc::now();
        let loan = open_loan(day0);
        assert_eq!(loan.due_date, day0 + Duration::days(14));

        let returned = return_loan(&loan, day0 + Duration::days(16)).unwrap();

        assert_eq!(returned.late_fee, Some(4.0));
        assert_eq!(status_of(&returned, day0 + Duration::days(16)), LoanStatus::Returned);
    }

    #[test]
    fn test_return_loan_fails_when_already_returned() {
        let now = Utc::now();
        let loan = open_loan(now);
        let returned = return_loan(&loan, now + Duration::days(7)).unwrap();

        // 2回目の返却は失敗し、料金は変わらない
        let result = return_loan(&returned, now + Duration::days(20));
        assert_eq!(result.unwrap_err(), ReturnLoanError::AlreadyReturned);
        assert_eq!(returned.late_fee, Some(0.0));
    }
}
