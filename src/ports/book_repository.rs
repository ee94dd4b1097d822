use crate::domain::catalog::{Author, Book};
use crate::domain::value_objects::{AuthorId, BookId};
use async_trait::async_trait;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍登録のエラー
///
/// ISBNの一意制約違反を型で区別する。競合時の判定を
/// エラーメッセージの文字列照合に頼らないため。
#[derive(Debug, Error)]
pub enum InsertBookError {
    /// ISBNが既に登録済み
    #[error("ISBN already registered")]
    DuplicateIsbn,
    /// ストレージ層の障害
    #[error("book repository backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 書籍リポジトリポート
///
/// カタログ（著者・書籍）の永続化を抽象化する。
/// 空き状況は保持しない（LoanRepositoryから導出）。
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// 著者を登録する
    async fn insert_author(&self, author: Author) -> Result<()>;

    /// 著者一覧を取得する（登録順、ページネーション付き）
    async fn list_authors(&self, skip: i64, limit: i64) -> Result<Vec<Author>>;

    /// IDで著者を取得する
    async fn find_author(&self, author_id: AuthorId) -> Result<Option<Author>>;

    /// 書籍を登録する
    ///
    /// ISBNの一意制約違反は`InsertBookError::DuplicateIsbn`として返す。
    async fn insert(&self, book: Book) -> std::result::Result<(), InsertBookError>;

    /// IDで書籍を取得する
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// ISBNで書籍を取得する（事前の重複チェックに使用）
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;

    /// 書籍一覧を取得する（登録順、ページネーション付き）
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Book>>;
}
