use thiserror::Error;

/// アプリケーション層のエラー
///
/// ドメインエラーはすべてここで型付きに分類され、
/// API層で構造化された4xxレスポンスに変換される。
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// リソースが存在しない（または会員が無効）
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 書籍に未返却の貸出がある
    #[error("Book is not available for loan")]
    BookUnavailable,

    /// 貸出上限（3冊）を超えている
    #[error("Member has reached the maximum limit of 3 open loans")]
    LoanLimitExceeded,

    /// 既に返却済み
    #[error("Loan is already returned")]
    AlreadyReturned,

    /// ISBNが既に登録済み
    #[error("ISBN already registered")]
    DuplicateIsbn,

    /// メールアドレスが既に登録済み
    #[error("Email already registered")]
    DuplicateEmail,

    /// 入力値が不正（必須項目の欠落など）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 認証失敗
    #[error("Incorrect email or password")]
    Unauthorized,

    /// リポジトリの障害
    #[error("Repository error")]
    Repository(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;
