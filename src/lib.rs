//! Bookstore catalog application library.
//!
//! Provides the catalog modules (authors, genres, books) and the bootstrap
//! routines shared by the server binary and the CLI.

pub mod error;
pub mod modules;
pub mod utils;

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

pub use error::{CatalogError, CatalogResult};

/// Connect to the configured database and build the module registry
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<(SqlitePool, ModuleRegistry)> {
    let pool = bookstore_db::connect(&settings.database)
        .await
        .context("failed to open catalog database")?;
    let registry = modules::build_registry(&pool);
    Ok((pool, registry))
}

/// Apply pending migrations and exit
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let (pool, registry) = bootstrap(settings).await?;
    let applied = bookstore_db::run_migrations(&pool, &registry).await?;
    tracing::info!(applied, "migrations complete");
    pool.close().await;
    Ok(applied)
}

/// Migrate, initialize modules and serve HTTP until shutdown
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let (pool, registry) = bootstrap(settings).await?;
    bookstore_db::run_migrations(&pool, &registry).await?;

    registry.init_modules(&InitCtx { settings }).await?;

    let served = bookstore_http::start_server(&registry, settings).await;
    pool.close().await;
    served
}

/// Every documented route as `METHOD /path`, sorted by path
pub async fn route_table() -> anyhow::Result<Vec<String>> {
    // Routes do not depend on stored data, so a throwaway database suffices
    let pool = bookstore_db::connect_in_memory().await?;
    let registry = modules::build_registry(&pool);
    let spec = bookstore_http::router::merged_openapi(&registry);

    let mut routes = Vec::new();
    if let Some(paths) = spec["paths"].as_object() {
        for (path, item) in paths {
            let Some(operations) = item.as_object() else {
                continue;
            };
            for method in operations.keys() {
                routes.push(format!("{} {}", method.to_uppercase(), path));
            }
        }
    }
    routes.sort_by(|a, b| route_path(a).cmp(route_path(b)).then_with(|| a.cmp(b)));
    Ok(routes)
}

fn route_path(route: &str) -> &str {
    route.split_once(' ').map_or(route, |(_, path)| path)
}
