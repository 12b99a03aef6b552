//! SQL statements for the `authors` table.

use async_trait::async_trait;

use bookshelf_db::{DbResult, Executor};

use super::models::{Author, AuthorUpdate};

/// Statement executors scoped to a caller-supplied transaction.
#[async_trait]
pub trait AuthorQuery: Send + Sync {
    async fn create(&self, tx: &Executor, author: &Author) -> DbResult<()>;

    /// Overwrite name, bio and birth date. Affecting zero rows is not an error.
    async fn update(&self, tx: &Executor, id: &str, update: &AuthorUpdate) -> DbResult<()>;

    /// `DbError::NotFound` when no author has `id`.
    async fn find_by_id(&self, tx: &Executor, id: &str) -> DbResult<Author>;

    /// The stored name equal to `name`, if any. No match is `Ok(None)`.
    async fn find_name(&self, tx: &Executor, name: &str) -> DbResult<Option<String>>;

    async fn find_all(&self, tx: &Executor) -> DbResult<Vec<Author>>;

    async fn delete(&self, tx: &Executor, id: &str) -> DbResult<()>;
}

/// Postgres implementation of [`AuthorQuery`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PgAuthorQuery;

#[async_trait]
impl AuthorQuery for PgAuthorQuery {
    async fn create(&self, tx: &Executor, author: &Author) -> DbResult<()> {
        let mut conn = tx.acquire().await?;
        sqlx::query(
            "INSERT INTO authors (id, name, bio, birth_date, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&author.id)
        .bind(&author.name)
        .bind(&author.bio)
        .bind(&author.birth_date)
        .bind(author.created_at)
        .execute(&mut **conn)
        .await?;
        Ok(())
    }

    async fn update(&self, tx: &Executor, id: &str, update: &AuthorUpdate) -> DbResult<()> {
        let mut conn = tx.acquire().await?;
        sqlx::query("UPDATE authors SET name = $1, bio = $2, birth_date = $3 WHERE id = $4")
            .bind(&update.name)
            .bind(&update.bio)
            .bind(&update.birth_date)
            .bind(id)
            .execute(&mut **conn)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, tx: &Executor, id: &str) -> DbResult<Author> {
        let mut conn = tx.acquire().await?;
        let author = sqlx::query_as::<_, Author>(
            "SELECT a.id, a.name, a.bio, a.birth_date, a.created_at FROM authors AS a WHERE a.id = $1",
        )
        .bind(id)
        .fetch_one(&mut **conn)
        .await?;
        Ok(author)
    }

    async fn find_name(&self, tx: &Executor, name: &str) -> DbResult<Option<String>> {
        let mut conn = tx.acquire().await?;
        let row: Option<(String,)> = sqlx::query_as("SELECT a.name FROM authors AS a WHERE a.name = $1")
            .bind(name)
            .fetch_optional(&mut **conn)
            .await?;
        Ok(row.map(|(name,)| name))
    }

    async fn find_all(&self, tx: &Executor) -> DbResult<Vec<Author>> {
        let mut conn = tx.acquire().await?;
        let authors = sqlx::query_as::<_, Author>(
            "SELECT a.id, a.name, a.bio, a.birth_date, a.created_at FROM authors AS a",
        )
        .fetch_all(&mut **conn)
        .await?;
        Ok(authors)
    }

    async fn delete(&self, tx: &Executor, id: &str) -> DbResult<()> {
        let mut conn = tx.acquire().await?;
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut **conn)
            .await?;
        Ok(())
    }
}
