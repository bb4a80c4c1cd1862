pub mod models;
pub mod repository;
pub mod routes;
pub mod search;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use super::openapi;
use service::BookService;

/// Books catalog module
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(service: BookService) -> Self {
        Self { service }
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
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let mut paths = openapi::crud_paths("Books", "Book", "BookDraft");
        paths["/search"] = json!({
            "get": {
                "summary": "Search books",
                "description": "Case-insensitive substring match; supplied parameters are combined with AND.",
                "tags": ["Books"],
                "parameters": [
                    { "name": "title", "in": "query", "required": false, "schema": { "type": "string" } },
                    { "name": "author", "in": "query", "required": false, "schema": { "type": "string" } },
                    { "name": "genre", "in": "query", "required": false, "schema": { "type": "string" } }
                ],
                "responses": {
                    "200": openapi::json_response(
                        "Matching books",
                        json!({ "type": "array", "items": openapi::schema_ref("Book") })
                    )
                }
            }
        });

        let reference = json!({
            "type": "object",
            "properties": { "id": { "type": "integer", "format": "int64" } },
            "required": ["id"]
        });

        Some(json!({
            "paths": paths,
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "price": { "type": "number", "description": "Two fractional digits" },
                            "quantity": { "type": "integer", "minimum": 0 },
                            "author": openapi::schema_ref("Author"),
                            "genre": openapi::schema_ref("Genre")
                        },
                        "required": ["id", "title", "price", "quantity", "author", "genre"]
                    },
                    "BookDraft": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1 },
                            "price": { "type": "number", "exclusiveMinimum": 0 },
                            "quantity": { "type": "integer", "minimum": 0 },
                            "author": reference.clone(),
                            "genre": reference
                        },
                        "required": ["title", "price", "quantity", "author", "genre"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration::new(
            "0003_create_books",
            r#"
                CREATE TABLE books (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    title       TEXT    NOT NULL CHECK (trim(title) <> ''),
                    price_cents INTEGER NOT NULL CHECK (price_cents > 0),
                    quantity    INTEGER NOT NULL CHECK (quantity >= 0),
                    author_id   INTEGER NOT NULL REFERENCES authors (id),
                    genre_id    INTEGER NOT NULL REFERENCES genres (id)
                );
                CREATE INDEX books_author_id ON books (author_id);
                CREATE INDEX books_genre_id ON books (genre_id);
                "#,
        )]
    }
}

/// Create a new instance of the books module
pub fn create_module(service: BookService) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(service))
}
