use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;

use bookshelf_db::{DbResult, Store};

use super::models::{Book, BookResponse, BookUpdate};
use super::query::BookQuery;

/// Book persistence; one transaction per call.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(&self, book: &Book) -> DbResult<()>;
    async fn update(&self, id: &str, update: &BookUpdate) -> DbResult<()>;
    async fn find_by_id(&self, id: &str) -> DbResult<BookResponse>;
    async fn find_title(&self, title: &str) -> DbResult<Option<String>>;
    async fn find_all(&self) -> DbResult<Vec<BookResponse>>;
    async fn delete(&self, id: &str) -> DbResult<()>;
}

pub struct PgBookRepository {
    store: Store,
    query: Arc<dyn BookQuery>,
}

impl PgBookRepository {
    pub fn new(store: Store, query: Arc<dyn BookQuery>) -> Self {
        Self { store, query }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn create(&self, book: &Book) -> DbResult<()> {
        let query = self.query.clone();
        let book = book.clone();
        self.store
            .with_transaction(|tx| async move { query.create(&tx, &book).await }.boxed())
            .await
    }

    async fn update(&self, id: &str, update: &BookUpdate) -> DbResult<()> {
        let query = self.query.clone();
        let (id, update) = (id.to_string(), update.clone());
        self.store
            .with_transaction(|tx| async move { query.update(&tx, &id, &update).await }.boxed())
            .await
    }

    async fn find_by_id(&self, id: &str) -> DbResult<BookResponse> {
        let query = self.query.clone();
        let id = id.to_string();
        self.store
            .with_transaction(|tx| async move { query.find_by_id(&tx, &id).await }.boxed())
            .await
    }

    async fn find_title(&self, title: &str) -> DbResult<Option<String>> {
        let query = self.query.clone();
        let title = title.to_string();
        self.store
            .with_transaction(|tx| async move { query.find_title(&tx, &title).await }.boxed())
            .await
    }

    async fn find_all(&self) -> DbResult<Vec<BookResponse>> {
        let query = self.query.clone();
        self.store
            .with_transaction(|tx| async move { query.find_all(&tx).await }.boxed())
            .await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let query = self.query.clone();
        let id = id.to_string();
        self.store
            .with_transaction(|tx| async move { query.delete(&tx, &id).await }.boxed())
            .await
    }
}
