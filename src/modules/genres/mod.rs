pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};

use super::openapi;
use service::GenreService;

/// Genres catalog module
pub struct GenresModule {
    service: GenreService,
}

impl GenresModule {
    pub fn new(service: GenreService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "genres module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::named_resource("Genres", "Genre"))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration::new(
            "0002_create_genres",
            r#"
                CREATE TABLE genres (
                    id   INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL CHECK (trim(name) <> '')
                );
                "#,
        )]
    }
}

/// Create a new instance of the genres module
pub fn create_module(service: GenreService) -> Arc<dyn Module> {
    Arc::new(GenresModule::new(service))
}
