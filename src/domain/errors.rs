/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLoanError {
    /// 既に返却済み（再返却は冪等ではなく拒否する）
    AlreadyReturned,
}
