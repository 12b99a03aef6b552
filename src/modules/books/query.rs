//! SQL statements for the `books` table.

use async_trait::async_trait;

use bookshelf_db::{DbResult, Executor};

use super::models::{Book, BookResponse, BookUpdate};

const SELECT_WITH_AUTHOR: &str = "SELECT b.id, b.title, b.description, b.publish_date, b.author_id, a.name AS author_name \
     FROM books AS b LEFT JOIN authors AS a ON b.author_id = a.id";

/// Statement executors scoped to a caller-supplied transaction.
#[async_trait]
pub trait BookQuery: Send + Sync {
    async fn create(&self, tx: &Executor, book: &Book) -> DbResult<()>;

    /// Overwrite title, description, publish date and author reference.
    async fn update(&self, tx: &Executor, id: &str, update: &BookUpdate) -> DbResult<()>;

    /// Joined read; `DbError::NotFound` when no book has `id`.
    async fn find_by_id(&self, tx: &Executor, id: &str) -> DbResult<BookResponse>;

    /// The stored title equal to `title`, if any.
    async fn find_title(&self, tx: &Executor, title: &str) -> DbResult<Option<String>>;

    async fn find_all(&self, tx: &Executor) -> DbResult<Vec<BookResponse>>;

    async fn delete(&self, tx: &Executor, id: &str) -> DbResult<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PgBookQuery;

#[async_trait]
impl BookQuery for PgBookQuery {
    async fn create(&self, tx: &Executor, book: &Book) -> DbResult<()> {
        let mut conn = tx.acquire().await?;
        sqlx::query(
            "INSERT INTO books (id, title, description, author_id, publish_date, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.author_id)
        .bind(&book.publish_date)
        .bind(book.created_at)
        .execute(&mut **conn)
        .await?;
        Ok(())
    }

    async fn update(&self, tx: &Executor, id: &str, update: &BookUpdate) -> DbResult<()> {
        let mut conn = tx.acquire().await?;
        sqlx::query(
            "UPDATE books SET title = $1, description = $2, publish_date = $3, author_id = $4 WHERE id = $5",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.publish_date)
        .bind(&update.author_id)
        .bind(id)
        .execute(&mut **conn)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, tx: &Executor, id: &str) -> DbResult<BookResponse> {
        let mut conn = tx.acquire().await?;
        let book = sqlx::query_as::<_, BookResponse>(&format!("{SELECT_WITH_AUTHOR} WHERE b.id = $1"))
            .bind(id)
            .fetch_one(&mut **conn)
            .await?;
        Ok(book)
    }

    async fn find_title(&self, tx: &Executor, title: &str) -> DbResult<Option<String>> {
        let mut conn = tx.acquire().await?;
        let row: Option<(String,)> = sqlx::query_as("SELECT b.title FROM books AS b WHERE b.title = $1")
            .bind(title)
            .fetch_optional(&mut **conn)
            .await?;
        Ok(row.map(|(title,)| title))
    }

    async fn find_all(&self, tx: &Executor) -> DbResult<Vec<BookResponse>> {
        let mut conn = tx.acquire().await?;
        let books = sqlx::query_as::<_, BookResponse>(SELECT_WITH_AUTHOR)
            .fetch_all(&mut **conn)
            .await?;
        Ok(books)
    }

    async fn delete(&self, tx: &Executor, id: &str) -> DbResult<()> {
        let mut conn = tx.acquire().await?;
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut **conn)
            .await?;
        Ok(())
    }
}
