use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthorId, BookId};

/// カタログ登録のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// 著者名が空
    EmptyAuthorName,
    /// 書名が空
    EmptyTitle,
}

/// 著者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub author_id: AuthorId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// 書籍
///
/// 空き状況（available）はフィールドとして保持しない。
/// 「未返却の貸出が存在しない」ことから都度導出する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    /// ISBN（任意、一意）。空白のみの入力はNoneに正規化する。
    pub isbn: Option<String>,
    pub author_id: AuthorId,
    pub created_at: DateTime<Utc>,
}

/// 純粋関数：著者を登録する
pub fn new_author(name: &str, now: DateTime<Utc>) -> Result<Author, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::EmptyAuthorName);
    }

    Ok(Author {
        author_id: AuthorId::new(),
        name: name.to_string(),
        created_at: now,
    })
}

/// 純粋関数：書籍を登録する
///
/// ISBNの重複検証はアプリケーション層とリポジトリの一意制約の責務。
pub fn new_book(
    title: &str,
    isbn: Option<&str>,
    author_id: AuthorId,
    now: DateTime<Utc>,
) -> Result<Book, CatalogError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::EmptyTitle);
    }

    let isbn = isbn
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(Book {
        book_id: BookId::new(),
        title: title.to_string(),
        isbn,
        author_id,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_author_success() {
        let author = new_author("Machado de Assis", Utc::now()).unwrap();
        assert_eq!(author.name, "Machado de Assis");
    }

    #[test]
    fn test_new_author_rejects_empty_name() {
        assert_eq!(new_author("  ", Utc::now()), Err(CatalogError::EmptyAuthorName));
    }

    #[test]
    fn test_new_book_success() {
        let author_id = AuthorId::new();
        let book = new_book("Dom Casmurro", Some("9780195103090"), author_id, Utc::now()).unwrap();

        assert_eq!(book.title, "Dom Casmurro");
        assert_eq!(book.isbn.as_deref(), Some("9780195103090"));
        assert_eq!(book.author_id, author_id);
    }

    #[test]
    fn test_new_book_rejects_empty_title() {
        let result = new_book("", None, AuthorId::new(), Utc::now());
        assert_eq!(result, Err(CatalogError::EmptyTitle));
    }

    #[test]
    fn test_new_book_normalizes_blank_isbn_to_none() {
        let book = new_book("Dom Casmurro", Some("   "), AuthorId::new(), Utc::now()).unwrap();
        assert_eq!(book.isbn, None);
    }
}
