use chrono::{DateTime, Utc};

use crate::domain::catalog::{self, Author, Book, CatalogError};
use crate::domain::value_objects::{AuthorId, BookId};
use crate::ports::InsertBookError;

use super::errors::{ApplicationError, Result};
use super::loan_service::ServiceDependencies;

fn repository_error(e: Box<dyn std::error::Error + Send + Sync>) -> ApplicationError {
    ApplicationError::Repository(e)
}

fn catalog_error(e: CatalogError) -> ApplicationError {
    match e {
        CatalogError::EmptyAuthorName => {
            ApplicationError::Validation("author name must not be empty".to_string())
        }
        CatalogError::EmptyTitle => {
            ApplicationError::Validation("book title must not be empty".to_string())
        }
    }
}

/// 著者を登録する
pub async fn create_author(
    deps: &ServiceDependencies,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Author> {
    let author = catalog::new_author(name, now).map_err(catalog_error)?;

    deps.book_repository
        .insert_author(author.clone())
        .await
        .map_err(repository_error)?;

    Ok(author)
}

/// 著者一覧を取得する
pub async fn list_authors(
    deps: &ServiceDependencies,
    skip: i64,
    limit: i64,
) -> Result<Vec<Author>> {
    deps.book_repository
        .list_authors(skip, limit)
        .await
        .map_err(repository_error)
}

/// 書籍を登録する
///
/// ビジネスルール：
/// - 著者が存在すること
/// - ISBNが指定される場合、既存の書籍と重複しないこと
///
/// 重複は事前チェックに加えてリポジトリの一意制約でも検出され、
/// どちらも型付きのDuplicateIsbnとして返る。
pub async fn create_book(
    deps: &ServiceDependencies,
    title: &str,
    isbn: Option<&str>,
    author_id: AuthorId,
    now: DateTime<Utc>,
) -> Result<Book> {
    // 1. 著者の存在確認
    let author = deps
        .book_repository
        .find_author(author_id)
        .await
        .map_err(repository_error)?;

    if author.is_none() {
        return Err(ApplicationError::NotFound("Author"));
    }

    // 2. ドメイン層で書籍を生成（ISBNの正規化を含む）
    let book = catalog::new_book(title, isbn, author_id, now).map_err(catalog_error)?;

    // 3. ISBNの重複チェック
    if let Some(isbn) = &book.isbn {
        let existing = deps
            .book_repository
            .find_by_isbn(isbn)
            .await
            .map_err(repository_error)?;

        if existing.is_some() {
            return Err(ApplicationError::DuplicateIsbn);
        }
    }

    // 4. 永続化（競合時は一意制約が検出）
    deps.book_repository
        .insert(book.clone())
        .await
        .map_err(|e| match e {
            InsertBookError::DuplicateIsbn => ApplicationError::DuplicateIsbn,
            InsertBookError::Backend(e) => ApplicationError::Repository(e),
        })?;

    Ok(book)
}

/// 書籍一覧を取得する（空き状況付き）
///
/// 空き状況は「未返却の貸出が存在しない」ことから導出する。
/// 1クエリでまとめて解決し、N+1を避ける。
pub async fn list_books(
    deps: &ServiceDependencies,
    skip: i64,
    limit: i64,
) -> Result<Vec<(Book, bool)>> {
    let books = deps
        .book_repository
        .list(skip, limit)
        .await
        .map_err(repository_error)?;

    let ids: Vec<BookId> = books.iter().map(|b| b.book_id).collect();
    let on_loan = deps
        .loan_repository
        .open_book_ids(&ids)
        .await
        .map_err(repository_error)?;

    Ok(books
        .into_iter()
        .map(|b| {
            let available = !on_loan.contains(&b.book_id);
            (b, available)
        })
        .collect())
}

/// 書籍の空き状況を確認する
pub async fn book_availability(deps: &ServiceDependencies, book_id: BookId) -> Result<bool> {
    let book = deps
        .book_repository
        .find_by_id(book_id)
        .await
        .map_err(repository_error)?;

    if book.is_none() {
        return Err(ApplicationError::NotFound("Book"));
    }

    let open_loan = deps
        .loan_repository
        .find_open_by_book(book_id)
        .await
        .map_err(repository_error)?;

    Ok(open_loan.is_none())
}
