pub mod models;
pub mod query;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use bookshelf_cache::Cache;
use bookshelf_db::Store;
use bookshelf_kernel::{InitCtx, Migration, Module};

use query::PgBookQuery;
use repository::{BookRepository, PgBookRepository};
use service::BookService;

/// Books catalogue; the listing is served through the cache.
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(repository: Arc<dyn BookRepository>, cache: Arc<dyn Cache>) -> Self {
        Self {
            service: Arc::new(BookService::new(repository, cache)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            cache_key = service::BOOKS_CACHE_KEY,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_body = serde_json::json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookRequest" }
                }
            }
        });
        let error = serde_json::json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let id_param = serde_json::json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        }]);
        let book = serde_json::json!({
            "description": "Book wrapped in the response envelope",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Book" }
                }
            }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books (cached)",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error
                        }
                    },
                    "post": {
                        "summary": "Create book",
                        "tags": ["Books"],
                        "requestBody": book_body,
                        "responses": { "200": book, "400": error, "500": error }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": { "200": book, "404": error, "500": error }
                    },
                    "put": {
                        "summary": "Update book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "requestBody": book_body,
                        "responses": { "200": book, "400": error, "404": error, "500": error }
                    },
                    "delete": {
                        "summary": "Delete book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": { "200": book, "404": error, "500": error }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "publish_date": { "type": "string" },
                            "author_id": { "type": "string", "nullable": true },
                            "author_name": {
                                "type": "string",
                                "description": "Omitted when the author no longer exists"
                            }
                        },
                        "required": ["id", "title", "description", "publish_date"]
                    },
                    "BookRequest": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "author_id": { "type": "string" },
                            "publish_date": { "type": "string" }
                        },
                        "required": ["title", "description", "author_id", "publish_date"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        // author_id carries no foreign key: deleting an author leaves its books.
        vec![
            Migration {
                id: "001_init",
                up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id            TEXT PRIMARY KEY,
                    title         TEXT NOT NULL,
                    description   TEXT NOT NULL,
                    author_id     TEXT,
                    publish_date  TEXT NOT NULL,
                    created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                "#,
            },
            Migration {
                id: "002_unique_title",
                up: "CREATE UNIQUE INDEX IF NOT EXISTS books_title_key ON books (title);",
            },
        ]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

pub fn create_module(store: Store, cache: Arc<dyn Cache>) -> Arc<dyn Module> {
    let repository = PgBookRepository::new(store, Arc::new(PgBookQuery));
    Arc::new(BooksModule::new(Arc::new(repository), cache))
}
