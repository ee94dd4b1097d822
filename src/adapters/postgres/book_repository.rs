use crate::domain::catalog::{Author, Book};
use crate::domain::value_objects::{AuthorId, BookId};
use crate::ports::book_repository::{BookRepository as BookRepositoryTrait, InsertBookError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_author(row: &PgRow) -> Author {
    Author {
        author_id: AuthorId::from_uuid(row.get("author_id")),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        book_id: BookId::from_uuid(row.get("book_id")),
        title: row.get("title"),
        isbn: row.get("isbn"),
        author_id: AuthorId::from_uuid(row.get("author_id")),
        created_at: row.get("created_at"),
    }
}

/// BookRepositoryのPostgreSQL実装
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn insert_author(&self, author: Author) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO authors (author_id, name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(author.author_id.value())
        .bind(&author.name)
        .bind(author.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_authors(&self, skip: i64, limit: i64) -> Result<Vec<Author>> {
        let rows = sqlx::query(
            r#"
            SELECT author_id, name, created_at
            FROM authors
            ORDER BY created_at ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_author).collect())
    }

    async fn find_author(&self, author_id: AuthorId) -> Result<Option<Author>> {
        let row = sqlx::query(
            r#"
            SELECT author_id, name, created_at
            FROM authors
            WHERE author_id = $1
            "#,
        )
        .bind(author_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_author))
    }

    /// 書籍を登録する
    ///
    /// ISBNの一意制約違反はDuplicateIsbnに変換する。
    async fn insert(&self, book: Book) -> std::result::Result<(), InsertBookError> {
        sqlx::query(
            r#"
            INSERT INTO books (book_id, title, isbn, author_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(book.book_id.value())
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.author_id.value())
        .bind(book.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => InsertBookError::DuplicateIsbn,
            _ => InsertBookError::Backend(Box::new(e)),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT book_id, title, isbn, author_id, created_at
            FROM books
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT book_id, title, isbn, author_id, created_at
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT book_id, title, isbn, author_id, created_at
            FROM books
            ORDER BY created_at ASC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }
}
