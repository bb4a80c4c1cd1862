pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};

use super::openapi;
use service::AuthorService;

/// Authors catalog module
pub struct AuthorsModule {
    service: AuthorService,
}

impl AuthorsModule {
    pub fn new(service: AuthorService) -> Self {
        Self { service }
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
        Some(openapi::named_resource("Authors", "Author"))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration::new(
            "0001_create_authors",
            r#"
                CREATE TABLE authors (
                    id   INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL CHECK (trim(name) <> '')
                );
                "#,
        )]
    }
}

/// Create a new instance of the authors module
pub fn create_module(service: AuthorService) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(service))
}
