use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;

use bookshelf_db::{DbResult, Store};

use super::models::{Author, AuthorUpdate};
use super::query::AuthorQuery;

/// Author persistence; every call is its own transaction.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn create(&self, author: &Author) -> DbResult<()>;
    async fn update(&self, id: &str, update: &AuthorUpdate) -> DbResult<()>;
    async fn find_by_id(&self, id: &str) -> DbResult<Author>;
    async fn find_name(&self, name: &str) -> DbResult<Option<String>>;
    async fn find_all(&self) -> DbResult<Vec<Author>>;
    async fn delete(&self, id: &str) -> DbResult<()>;
}

/// Runs [`AuthorQuery`] statements through [`Store::with_transaction`].
pub struct PgAuthorRepository {
    store: Store,
    query: Arc<dyn AuthorQuery>,
}

impl PgAuthorRepository {
    pub fn new(store: Store, query: Arc<dyn AuthorQuery>) -> Self {
        Self { store, query }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn create(&self, author: &Author) -> DbResult<()> {
        let query = self.query.clone();
        let author = author.clone();
        self.store
            .with_transaction(|tx| async move { query.create(&tx, &author).await }.boxed())
            .await
    }

    async fn update(&self, id: &str, update: &AuthorUpdate) -> DbResult<()> {
        let query = self.query.clone();
        let (id, update) = (id.to_string(), update.clone());
        self.store
            .with_transaction(|tx| async move { query.update(&tx, &id, &update).await }.boxed())
            .await
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Author> {
        let query = self.query.clone();
        let id = id.to_string();
        self.store
            .with_transaction(|tx| async move { query.find_by_id(&tx, &id).await }.boxed())
            .await
    }

    async fn find_name(&self, name: &str) -> DbResult<Option<String>> {
        let query = self.query.clone();
        let name = name.to_string();
        self.store
            .with_transaction(|tx| async move { query.find_name(&tx, &name).await }.boxed())
            .await
    }

    async fn find_all(&self) -> DbResult<Vec<Author>> {
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
