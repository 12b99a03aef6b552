//! In-memory repositories and HTTP helpers shared by unit tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use parking_lot::Mutex;

use bookshelf_cache::{Cache, CacheError};
use bookshelf_db::{DbError, DbResult};

use crate::modules::authors::models::{Author, AuthorUpdate};
use crate::modules::authors::repository::AuthorRepository;
use crate::modules::books::models::{Book, BookResponse, BookUpdate};
use crate::modules::books::repository::BookRepository;

#[derive(Default)]
struct State {
    authors: Vec<Author>,
    books: Vec<Book>,
    author_writes: usize,
    book_writes: usize,
    book_list_reads: usize,
    author_write_fault: Option<DbError>,
    author_read_fault: Option<DbError>,
    book_read_fault: Option<DbError>,
}

/// Authors and books sharing one table set, so book reads see author
/// deletions the way the SQL left join does.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<State>>,
}

impl FakeCatalog {
    pub fn authors(&self) -> Arc<dyn AuthorRepository> {
        Arc::new(self.clone())
    }

    pub fn books(&self) -> Arc<dyn BookRepository> {
        Arc::new(FakeBooks(self.clone()))
    }

    /// Create, update and delete calls on authors, including failed ones.
    pub fn author_writes(&self) -> usize {
        self.state.lock().author_writes
    }

    pub fn author_count(&self) -> usize {
        self.state.lock().authors.len()
    }

    pub fn book_writes(&self) -> usize {
        self.state.lock().book_writes
    }

    pub fn book_list_reads(&self) -> usize {
        self.state.lock().book_list_reads
    }

    /// Fail the next author create, update or delete.
    pub fn fail_next_author_write(&self, err: DbError) {
        self.state.lock().author_write_fault = Some(err);
    }

    /// Fail the next author lookup by id.
    pub fn fail_next_author_read(&self, err: DbError) {
        self.state.lock().author_read_fault = Some(err);
    }

    /// Fail the next book lookup by id or listing.
    pub fn fail_next_book_read(&self, err: DbError) {
        self.state.lock().book_read_fault = Some(err);
    }
}

#[async_trait]
impl AuthorRepository for FakeCatalog {
    async fn create(&self, author: &Author) -> DbResult<()> {
        let mut state = self.state.lock();
        state.author_writes += 1;
        if let Some(err) = state.author_write_fault.take() {
            return Err(err);
        }
        state.authors.push(author.clone());
        Ok(())
    }

    async fn update(&self, id: &str, update: &AuthorUpdate) -> DbResult<()> {
        let mut state = self.state.lock();
        state.author_writes += 1;
        if let Some(err) = state.author_write_fault.take() {
            return Err(err);
        }
        if let Some(author) = state.authors.iter_mut().find(|author| author.id == id) {
            author.apply(update);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Author> {
        let mut state = self.state.lock();
        if let Some(err) = state.author_read_fault.take() {
            return Err(err);
        }
        state
            .authors
            .iter()
            .find(|author| author.id == id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn find_name(&self, name: &str) -> DbResult<Option<String>> {
        let state = self.state.lock();
        Ok(state
            .authors
            .iter()
            .find(|author| author.name == name)
            .map(|author| author.name.clone()))
    }

    async fn find_all(&self) -> DbResult<Vec<Author>> {
        Ok(self.state.lock().authors.clone())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.lock();
        state.author_writes += 1;
        if let Some(err) = state.author_write_fault.take() {
            return Err(err);
        }
        state.authors.retain(|author| author.id != id);
        Ok(())
    }
}

struct FakeBooks(FakeCatalog);

impl FakeBooks {
    fn joined(state: &State, book: &Book) -> BookResponse {
        BookResponse {
            id: book.id.clone(),
            title: book.title.clone(),
            description: book.description.clone(),
            publish_date: book.publish_date.clone(),
            author_id: Some(book.author_id.clone()),
            author_name: state
                .authors
                .iter()
                .find(|author| author.id == book.author_id)
                .map(|author| author.name.clone()),
        }
    }
}

#[async_trait]
impl BookRepository for FakeBooks {
    async fn create(&self, book: &Book) -> DbResult<()> {
        let mut state = self.0.state.lock();
        state.book_writes += 1;
        state.books.push(book.clone());
        Ok(())
    }

    async fn update(&self, id: &str, update: &BookUpdate) -> DbResult<()> {
        let mut state = self.0.state.lock();
        state.book_writes += 1;
        if let Some(book) = state.books.iter_mut().find(|book| book.id == id) {
            book.title = update.title.clone();
            book.description = update.description.clone();
            book.publish_date = update.publish_date.clone();
            book.author_id = update.author_id.clone();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DbResult<BookResponse> {
        let mut state = self.0.state.lock();
        if let Some(err) = state.book_read_fault.take() {
            return Err(err);
        }
        let state = &*state;
        state
            .books
            .iter()
            .find(|book| book.id == id)
            .map(|book| Self::joined(state, book))
            .ok_or(DbError::NotFound)
    }

    async fn find_title(&self, title: &str) -> DbResult<Option<String>> {
        let state = self.0.state.lock();
        Ok(state
            .books
            .iter()
            .find(|book| book.title == title)
            .map(|book| book.title.clone()))
    }

    async fn find_all(&self) -> DbResult<Vec<BookResponse>> {
        let mut state = self.0.state.lock();
        state.book_list_reads += 1;
        if let Some(err) = state.book_read_fault.take() {
            return Err(err);
        }
        let state = &*state;
        Ok(state
            .books
            .iter()
            .map(|book| Self::joined(state, book))
            .collect())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let mut state = self.0.state.lock();
        state.book_writes += 1;
        state.books.retain(|book| book.id != id);
        Ok(())
    }
}

/// Cache whose every operation reports a lost connection.
pub struct FailingCache;

#[async_trait]
impl Cache for FailingCache {
    async fn get(&self, _key: &str) -> bookshelf_cache::Result<Option<Vec<u8>>> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> bookshelf_cache::Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> bookshelf_cache::Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn delete_pattern(&self, _pattern: &str) -> bookshelf_cache::Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }

    async fn ping(&self) -> bookshelf_cache::Result<()> {
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
