pub mod models;
pub mod query;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use bookshelf_db::Store;
use bookshelf_kernel::{InitCtx, Migration, Module};

use query::PgAuthorQuery;
use repository::{AuthorRepository, PgAuthorRepository};
use service::AuthorService;

/// Authors catalogue: CRUD over the `authors` table, no caching.
pub struct AuthorsModule {
    service: Arc<AuthorService>,
}

impl AuthorsModule {
    pub fn new(repository: Arc<dyn AuthorRepository>) -> Self {
        Self {
            service: Arc::new(AuthorService::new(repository)),
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let author_body = serde_json::json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/AuthorRequest" }
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
        let author = serde_json::json!({
            "description": "Author wrapped in the response envelope",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Author" }
                }
            }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All authors",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Author" }
                                        }
                                    }
                                }
                            },
                            "500": error
                        }
                    },
                    "post": {
                        "summary": "Create author",
                        "tags": ["Authors"],
                        "requestBody": author_body,
                        "responses": {
                            "200": author,
                            "400": error,
                            "500": error
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": { "200": author, "404": error, "500": error }
                    },
                    "put": {
                        "summary": "Update author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "requestBody": author_body,
                        "responses": { "200": author, "400": error, "404": error, "500": error }
                    },
                    "delete": {
                        "summary": "Delete author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": { "200": author, "404": error, "500": error }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Authors health check",
                        "tags": ["Authors"],
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
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "bio": { "type": "string" },
                            "birth_date": { "type": "string" },
                            "created_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "bio", "birth_date", "created_at"]
                    },
                    "AuthorRequest": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "bio": { "type": "string" },
                            "birth_date": { "type": "string" }
                        },
                        "required": ["name", "bio", "birth_date"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                id: "001_init",
                up: r#"
                CREATE TABLE IF NOT EXISTS authors (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    bio         TEXT NOT NULL,
                    birth_date  TEXT NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                "#,
            },
            Migration {
                id: "002_unique_name",
                up: "CREATE UNIQUE INDEX IF NOT EXISTS authors_name_key ON authors (name);",
            },
        ]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Authors module backed by Postgres.
pub fn create_module(store: Store) -> Arc<dyn Module> {
    let repository = PgAuthorRepository::new(store, Arc::new(PgAuthorQuery));
    Arc::new(AuthorsModule::new(Arc::new(repository)))
}
