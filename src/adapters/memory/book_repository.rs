use crate::domain::catalog::{Author, Book};
use crate::domain::value_objects::{AuthorId, BookId};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, InsertBookError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// BookRepositoryのインメモリ実装
///
/// テストおよびデータベースなしの動作確認に使用する。
/// 挿入順を保持し、一意制約（ISBN）をロック内で検証する。
pub struct BookRepository {
    authors: Mutex<Vec<Author>>,
    books: Mutex<Vec<Book>>,
}

impl BookRepository {
    pub fn new() -> Self {
        Self {
            authors: Mutex::new(Vec::new()),
            books: Mutex::new(Vec::new()),
        }
    }
}

impl Default for BookRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn page<T: Clone>(items: &[T], skip: i64, limit: i64) -> Vec<T> {
    items
        .iter()
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn insert_author(&self, author: Author) -> Result<()> {
        self.authors.lock().unwrap().push(author);
        Ok(())
    }

    async fn list_authors(&self, skip: i64, limit: i64) -> Result<Vec<Author>> {
        Ok(page(&self.authors.lock().unwrap(), skip, limit))
    }

    async fn find_author(&self, author_id: AuthorId) -> Result<Option<Author>> {
        Ok(self
            .authors
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.author_id == author_id)
            .cloned())
    }

    async fn insert(&self, book: Book) -> std::result::Result<(), InsertBookError> {
        let mut books = self.books.lock().unwrap();

        // 一意制約：ISBN（指定されている場合のみ）
        if let Some(isbn) = &book.isbn {
            if books.iter().any(|b| b.isbn.as_deref() == Some(isbn)) {
                return Err(InsertBookError::DuplicateIsbn);
            }
        }

        books.push(book);
        Ok(())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.book_id == book_id)
            .cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.isbn.as_deref() == Some(isbn))
            .cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Book>> {
        Ok(page(&self.books.lock().unwrap(), skip, limit))
    }
}
