use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use bookshelf_cache::Cache;
use bookshelf_db::DbError;
use bookshelf_http::AppError;

use super::models::{Book, BookRequest, BookResponse, BookUpdate};
use super::repository::BookRepository;

/// Cache entry shared by every book listing.
pub const BOOKS_CACHE_KEY: &str = "driver:books";

/// Listing entries live for a week; writes do not evict them.
pub const BOOKS_CACHE_TTL: Duration = Duration::from_secs(168 * 60 * 60);

#[derive(Debug, Error)]
pub enum BookServiceError {
    #[error("book title '{title}' already exists")]
    Conflict { title: String },

    #[error("book '{id}' not found")]
    NotFound { id: String },

    #[error("book '{id}' was created but could not be read back: {source}")]
    ReadBack {
        id: String,
        #[source]
        source: DbError,
    },

    #[error(transparent)]
    Persistence(#[from] DbError),
}

impl From<BookServiceError> for AppError {
    fn from(err: BookServiceError) -> Self {
        match err {
            BookServiceError::Conflict { ref title } => AppError::conflict(
                vec![json!({"field": "title", "error": "already exists", "value": title})],
                "Book title already exists",
            ),
            BookServiceError::NotFound { .. } => AppError::not_found("Book not found"),
            BookServiceError::ReadBack { .. } => AppError::partial_success(format!(
                "Successfully created book, but failed to get the created book. Error: {err}"
            )),
            BookServiceError::Persistence(source) => AppError::Internal(source.into()),
        }
    }
}

type Result<T> = std::result::Result<T, BookServiceError>;

/// Book use cases. The listing is read through [`BOOKS_CACHE_KEY`].
pub struct BookService {
    repository: Arc<dyn BookRepository>,
    cache: Arc<dyn Cache>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { repository, cache }
    }

    pub async fn create(&self, request: BookRequest) -> Result<BookResponse> {
        if let Some(title) = self.repository.find_title(&request.title).await? {
            return Err(BookServiceError::Conflict { title });
        }

        let book = Book::from_request(request);
        self.repository
            .create(&book)
            .await
            .map_err(|err| conflict_or(err, &book.title))?;

        let created = self.repository.find_by_id(&book.id).await.map_err(|source| {
            tracing::error!(id = %book.id, error = %source, "book read-back failed");
            BookServiceError::ReadBack {
                id: book.id.clone(),
                source,
            }
        })?;

        tracing::info!(id = %created.id, "book created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<BookResponse> {
        self.load(id).await
    }

    /// Overlay the request on the stored book, persist, and return the
    /// overlaid record.
    pub async fn update(&self, id: &str, request: BookRequest) -> Result<BookResponse> {
        let mut book = self.load(id).await?;
        let update = BookUpdate::from(request);

        self.repository
            .update(id, &update)
            .await
            .map_err(|err| conflict_or(err, &update.title))?;

        book.apply(&update);
        Ok(book)
    }

    /// Cache-aside listing.
    ///
    /// A cache fault or an undecodable entry counts as a miss. Failing to
    /// repopulate the cache does not fail the request.
    pub async fn find_all(&self) -> Result<Vec<BookResponse>> {
        match self.cache.get(BOOKS_CACHE_KEY).await {
            Ok(Some(bytes)) => match decode_listing(&bytes) {
                Ok(books) => {
                    tracing::debug!(key = BOOKS_CACHE_KEY, count = books.len(), "cache hit");
                    return Ok(books);
                }
                Err(err) => {
                    tracing::warn!(key = BOOKS_CACHE_KEY, error = %err, "discarding undecodable cache entry");
                }
            },
            Ok(None) => tracing::debug!(key = BOOKS_CACHE_KEY, "cache miss"),
            Err(err) => {
                tracing::warn!(key = BOOKS_CACHE_KEY, error = %err, "cache read failed, falling back to store");
            }
        }

        let books = self.repository.find_all().await?;

        match encode_listing(&books) {
            Ok(bytes) => {
                if let Err(err) = self
                    .cache
                    .set(BOOKS_CACHE_KEY, &bytes, Some(BOOKS_CACHE_TTL))
                    .await
                {
                    tracing::warn!(key = BOOKS_CACHE_KEY, error = %err, "failed to cache book listing");
                }
            }
            Err(err) => {
                tracing::warn!(key = BOOKS_CACHE_KEY, error = %err, "failed to encode book listing");
            }
        }

        Ok(books)
    }

    /// Delete and return the record as it was before deletion.
    pub async fn delete(&self, id: &str) -> Result<BookResponse> {
        let book = self.load(id).await?;
        self.repository.delete(id).await?;
        tracing::info!(id, "book deleted");
        Ok(book)
    }

    async fn load(&self, id: &str) -> Result<BookResponse> {
        self.repository.find_by_id(id).await.map_err(|err| match err {
            DbError::NotFound => BookServiceError::NotFound { id: id.to_string() },
            other => BookServiceError::Persistence(other),
        })
    }
}

fn conflict_or(err: DbError, title: &str) -> BookServiceError {
    if err.is_unique_violation() {
        BookServiceError::Conflict {
            title: title.to_string(),
        }
    } else {
        BookServiceError::Persistence(err)
    }
}

fn encode_listing(books: &[BookResponse]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(books)
}

fn decode_listing(bytes: &[u8]) -> serde_json::Result<Vec<BookResponse>> {
    serde_json::from_slice(bytes)
}
